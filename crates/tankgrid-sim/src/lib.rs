//! Simulation engine for tankgrid.
//!
//! Owns the world aggregate, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the frontend.

pub mod config;
pub mod engine;
pub mod scenario;
pub mod scoring;
pub mod systems;
pub mod world;
pub mod world_setup;

pub use tankgrid_core as core;
pub use config::{ConfigError, SimConfig};
pub use engine::SimulationEngine;
pub use world::World;

#[cfg(test)]
mod tests;
