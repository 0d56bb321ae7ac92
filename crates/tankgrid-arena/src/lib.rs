//! Static battlefield for tankgrid.
//!
//! Wall, river and base layout, obstacle queries, line-of-sight sampling,
//! breadth-first pathfinding, and level decoding.

pub use tankgrid_core as core;

pub mod grid;
pub mod level;
pub mod los;
pub mod pathfind;

// Re-export key types for convenience.
pub use grid::{Arena, BrickImpact, ObstaclePolicy, SteelImpact, Tile};
pub use level::{LevelDefinition, LevelError, LevelParameters, TileSpec};
pub use los::{obstacle_between, steel_between};
pub use pathfind::{find_path_with, plan_path, BrickTarget, PathPlan};
