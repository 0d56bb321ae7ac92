//! Tank AI for tankgrid.
//!
//! Enemy wander behaviour and archetype profiles, plus the autopilot that
//! drives one player tank: bullet threat assessment, target selection,
//! predictive aiming and the per-tick decision pipeline.

pub mod fsm;
pub mod pipeline;
pub mod prediction;
pub mod profiles;
pub mod targeting;
pub mod threat;
pub mod view;

pub use tankgrid_core as core;

pub use pipeline::{Action, Autopilot, Decision};
pub use view::WorldView;
