//! Game state snapshot: the complete visible state handed to the render layer
//! after each tick.

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use crate::components::{Base, Fortification, PowerUp};
use crate::enums::*;
use crate::events::{AudioEvent, VisualEvent};
use crate::types::{Direction, SimTime};

/// Complete game state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub level: LevelView,
    pub players: Vec<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub walls: Vec<WallView>,
    pub rivers: Vec<IVec2>,
    pub bushes: Vec<IVec2>,
    pub base: Base,
    pub power_up: Option<PowerUp>,
    pub fortification: Fortification,
    /// Remaining clock-freeze ticks.
    pub frozen_ticks: u32,
    pub autopilot: AutopilotView,
    pub visual_events: Vec<VisualEvent>,
    pub audio_events: Vec<AudioEvent>,
}

/// Level progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelView {
    pub index: usize,
    pub name: String,
    pub enemies_total: u32,
    pub enemies_spawned: u32,
    /// Enemies not yet spawned.
    pub enemies_in_reserve: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub slot: PlayerSlot,
    pub position: DVec2,
    pub physical: IVec2,
    pub facing: Direction,
    pub moving: bool,
    pub alive: bool,
    pub power_level: u8,
    pub lives: u32,
    pub invulnerable: bool,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub archetype: EnemyArchetype,
    pub position: DVec2,
    pub physical: IVec2,
    pub facing: Direction,
    pub health: u8,
    pub carries_power_up: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub id: u32,
    pub position: DVec2,
    pub direction: Direction,
    pub owner: Shooter,
}

/// One live wall cell. Steel always reports all four quadrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallView {
    pub cell: IVec2,
    pub material: WallMaterial,
    pub quadrants: u8,
}

/// Running counters for the autonomous tank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutopilotStats {
    pub enemies_killed: u32,
    pub bullets_dodged: u32,
    pub bullets_destroyed: u32,
    /// Bricks fully cleared by any bullet.
    pub bricks_destroyed: u32,
}

/// Future-position prediction state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionView {
    pub active: bool,
    pub future_position: Option<DVec2>,
    pub path_clear: bool,
    pub line_of_sight: bool,
}

/// Decision-pipeline diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutopilotView {
    pub enabled: bool,
    pub strategy: Strategy,
    pub action: String,
    pub danger: DangerLevel,
    pub target_enemy: Option<u32>,
    pub path_length: usize,
    pub brick_target: Option<IVec2>,
    pub bullet_risk: RiskLevel,
    pub perpendicular_risk: RiskLevel,
    /// Ticks until the nearest predicted bullet collision, if any.
    pub time_to_collision: Option<f64>,
    pub prediction: PredictionView,
    pub stats: AutopilotStats,
}
