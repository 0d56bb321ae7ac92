//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the world aggregate, processes player commands,
//! runs all systems in a fixed order, and produces `GameStateSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tankgrid_ai::Autopilot;
use tankgrid_arena::LevelDefinition;
use tankgrid_core::commands::PlayerCommand;
use tankgrid_core::enums::{GamePhase, PlayerSlot};
use tankgrid_core::events::AudioEvent;
use tankgrid_core::input::InputIntent;
use tankgrid_core::state::GameStateSnapshot;
use tankgrid_core::types::SimTime;

pub use crate::config::SimConfig;
use crate::scenario;
use crate::systems;
use crate::world::World;
use crate::world_setup;

/// The simulation engine. Owns the world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    /// Phase to return to when unpaused.
    paused_from: GamePhase,
    config: SimConfig,
    campaign: Vec<LevelDefinition>,
    rng: ChaCha8Rng,
    autopilot: Autopilot,
    command_queue: VecDeque<PlayerCommand>,
    /// Ticks left before the next level loads after a stage clear.
    stage_clear_timer: u32,
}

impl SimulationEngine {
    /// Create an engine over the built-in campaign.
    pub fn new(config: SimConfig) -> Self {
        Self::with_campaign(config, scenario::builtin_campaign())
    }

    /// Create an engine over a custom campaign. An empty campaign plays the
    /// open field.
    pub fn with_campaign(config: SimConfig, campaign: Vec<LevelDefinition>) -> Self {
        let campaign = if campaign.is_empty() {
            warn!("empty campaign, falling back to the open field");
            vec![scenario::open_field()]
        } else {
            campaign
        };
        Self {
            world: World::new(config.starting_lives),
            time: SimTime::default(),
            phase: GamePhase::default(),
            paused_from: GamePhase::Active,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            autopilot: Autopilot::new(config.autopilot),
            config,
            campaign,
            command_queue: VecDeque::new(),
            stage_clear_timer: 0,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if matches!(self.phase, GamePhase::Active | GamePhase::StageClear) {
            self.run_systems();
            self.check_progress();
            self.time.advance();
        }

        let visual_events = std::mem::take(&mut self.world.visual_events);
        let audio_events = std::mem::take(&mut self.world.audio_events);
        let mut diagnostics = self.autopilot.diagnostics().clone();
        diagnostics.enabled = self.autopilot.enabled;
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &diagnostics,
            visual_events,
            audio_events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of levels in the campaign.
    pub fn campaign_len(&self) -> usize {
        self.campaign.len()
    }

    /// Get a read-only reference to the world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn autopilot(&self) -> &Autopilot {
        &self.autopilot
    }

    /// Mutable world access for scenario tests.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame => {
                if matches!(self.phase, GamePhase::Idle | GamePhase::GameOver) {
                    self.world = World::new(self.config.starting_lives);
                    self.autopilot = Autopilot::new(self.config.autopilot);
                    self.time = SimTime::default();
                    self.load_level(0);
                    info!("game started, seed {}", self.config.seed);
                }
            }
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Resume => self.resume(),
            PlayerCommand::TogglePause => {
                if self.phase == GamePhase::Paused {
                    self.resume();
                } else {
                    self.pause();
                }
            }
            PlayerCommand::LoadLevel { index } => {
                if self.phase != GamePhase::Idle {
                    self.load_level(index);
                }
            }
            PlayerCommand::SetInput { slot, intent } => {
                let previous = self.world.input(slot);
                self.world.inputs[slot.index()] = intent;
                if intent.pause && !previous.pause {
                    self.handle_command(PlayerCommand::TogglePause);
                }
            }
            PlayerCommand::SetAutopilot { enabled } => {
                self.autopilot.set_enabled(enabled);
                if !enabled {
                    self.world.inputs[PlayerSlot::Autopilot.index()] = InputIntent::default();
                }
            }
            PlayerCommand::SpawnPowerUp => {
                if matches!(self.phase, GamePhase::Active | GamePhase::StageClear) {
                    systems::power_up::spawn(&mut self.world, &mut self.rng, true);
                }
            }
        }
    }

    fn pause(&mut self) {
        if matches!(self.phase, GamePhase::Active | GamePhase::StageClear) {
            self.paused_from = self.phase;
            self.phase = GamePhase::Paused;
        }
    }

    fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = self.paused_from;
        }
    }

    /// Load campaign level `index` (wrapping) and start playing it.
    fn load_level(&mut self, index: usize) {
        let index = index % self.campaign.len();
        world_setup::setup_level(&mut self.world, &self.campaign[index], index);
        self.autopilot.reset();
        self.time.level_tick = 0;
        self.stage_clear_timer = 0;
        self.phase = GamePhase::Active;
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick = self.time.tick;
        // 1. Player tanks: autopilot decision, firing, movement, respawns
        systems::players::run(&mut self.world, &mut self.autopilot, tick);
        // 2. Enemies: spawner, wander decisions, firing, movement
        systems::enemies::run(&mut self.world, &mut self.rng, tick);
        // 3. Countdown timers (freeze, fortification)
        systems::timers::run(&mut self.world);
        // 4. Bullets (may break walls and kill tanks)
        systems::ballistics::run(&mut self.world, &mut self.rng);
        // 5. Power-up pickup
        systems::power_up::run(&mut self.world, tick);
    }

    /// Stage clear, level advance and game over.
    fn check_progress(&mut self) {
        if !self.world.arena.base.alive || self.world.all_players_eliminated() {
            self.phase = GamePhase::GameOver;
            self.autopilot.set_enabled(false);
            self.world.sound(AudioEvent::GameOver);
            info!(
                "game over at tick {}: base {}, score {}",
                self.time.tick,
                if self.world.arena.base.alive { "standing" } else { "destroyed" },
                crate::scoring::team_score(&self.world)
            );
            return;
        }

        match self.phase {
            GamePhase::Active if self.world.level_cleared() => {
                self.phase = GamePhase::StageClear;
                self.stage_clear_timer = self.config.stage_clear_delay_ticks;
                self.world.sound(AudioEvent::StageClear);
                info!("stage clear: level {} '{}'", self.world.level.index, self.world.level.name);
            }
            GamePhase::StageClear => {
                self.stage_clear_timer = self.stage_clear_timer.saturating_sub(1);
                if self.stage_clear_timer == 0 {
                    self.load_level(self.world.level.index + 1);
                }
            }
            _ => {}
        }
    }
}
