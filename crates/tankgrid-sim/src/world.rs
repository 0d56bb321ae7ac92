//! The owned world aggregate threaded through every system.

use tankgrid_arena::{Arena, LevelParameters};
use tankgrid_core::components::{Bullet, EnemyTank, Fortification, PlayerTank, PowerUp};
use tankgrid_core::enums::PlayerSlot;
use tankgrid_core::events::{AudioEvent, VisualEvent};
use tankgrid_core::input::InputIntent;
use tankgrid_core::state::AutopilotStats;

use crate::systems::enemy_spawner::Spawner;

/// The level currently being played.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelState {
    /// Position in the campaign.
    pub index: usize,
    pub name: String,
    pub parameters: LevelParameters,
}

/// Everything that changes during a tick. Systems borrow it mutably one at
/// a time, in the engine's fixed order.
#[derive(Debug, Clone)]
pub struct World {
    pub arena: Arena,
    /// Indexed by `PlayerSlot::index`.
    pub players: [PlayerTank; 2],
    pub enemies: Vec<EnemyTank>,
    pub bullets: Vec<Bullet>,
    pub power_up: Option<PowerUp>,
    pub fortification: Fortification,
    /// Remaining clock freeze; enemies do nothing while non-zero.
    pub frozen_ticks: u32,
    pub spawner: Spawner,
    pub level: LevelState,
    pub stats: AutopilotStats,
    /// Key-state tables, indexed by `PlayerSlot::index`.
    pub inputs: [InputIntent; 2],
    pub visual_events: Vec<VisualEvent>,
    pub audio_events: Vec<AudioEvent>,
    next_bullet_id: u32,
    next_enemy_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new(tankgrid_core::constants::DEFAULT_LIVES)
    }
}

impl World {
    /// Empty arena, both players alive at their spawn points.
    pub fn new(lives: u32) -> Self {
        Self {
            arena: Arena::empty(),
            players: [
                PlayerTank::new(PlayerSlot::Autopilot, lives),
                PlayerTank::new(PlayerSlot::Human, lives),
            ],
            enemies: Vec::new(),
            bullets: Vec::new(),
            power_up: None,
            fortification: Fortification::Idle,
            frozen_ticks: 0,
            spawner: Spawner::default(),
            level: LevelState::default(),
            stats: AutopilotStats::default(),
            inputs: [InputIntent::default(); 2],
            visual_events: Vec::new(),
            audio_events: Vec::new(),
            next_bullet_id: 0,
            next_enemy_id: 0,
        }
    }

    pub fn player(&self, slot: PlayerSlot) -> &PlayerTank {
        &self.players[slot.index()]
    }

    pub fn player_mut(&mut self, slot: PlayerSlot) -> &mut PlayerTank {
        &mut self.players[slot.index()]
    }

    pub fn input(&self, slot: PlayerSlot) -> InputIntent {
        self.inputs[slot.index()]
    }

    pub fn next_bullet_id(&mut self) -> u32 {
        self.next_bullet_id += 1;
        self.next_bullet_id
    }

    pub fn next_enemy_id(&mut self) -> u32 {
        self.next_enemy_id += 1;
        self.next_enemy_id
    }

    pub fn emit(&mut self, event: VisualEvent) {
        self.visual_events.push(event);
    }

    pub fn sound(&mut self, event: AudioEvent) {
        self.audio_events.push(event);
    }

    pub fn alive_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.hull.alive).count()
    }

    /// Both players are out of lives for good.
    pub fn all_players_eliminated(&self) -> bool {
        self.players.iter().all(|p| p.eliminated)
    }

    /// Every enemy of the level has spawned and none is left standing.
    pub fn level_cleared(&self) -> bool {
        self.spawner.spawned >= self.level.parameters.enemy_count && self.alive_enemy_count() == 0
    }
}
