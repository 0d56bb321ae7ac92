//! Commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::input::InputIntent;

/// All external actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Simulation control ---
    /// Load the first campaign level and start ticking.
    StartGame,
    Pause,
    Resume,
    TogglePause,
    /// Jump to a campaign level (wraps around the campaign length).
    LoadLevel { index: usize },

    // --- Input ---
    /// Replace a tank's key-state table.
    SetInput { slot: PlayerSlot, intent: InputIntent },
    /// Hand the autopilot tank to the decision pipeline (or to `SetInput`).
    SetAutopilot { enabled: bool },

    // --- Collaborator triggers ---
    /// Scheduled power-up respawn; replaces the current one.
    SpawnPowerUp,
}
