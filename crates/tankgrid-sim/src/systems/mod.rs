//! Systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only).
//! They do not own state; everything lives in the world aggregate.

pub mod autopilot;
pub mod ballistics;
pub mod enemies;
pub mod enemy_spawner;
pub mod fortification;
pub mod movement;
pub mod players;
pub mod power_up;
pub mod snapshot;
pub mod timers;
