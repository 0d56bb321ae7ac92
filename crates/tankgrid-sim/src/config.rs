//! Engine configuration, loadable from JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tankgrid_core::constants::{DEFAULT_LIVES, STAGE_CLEAR_DELAY_TICKS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Hand the autopilot tank to the decision pipeline at start.
    pub autopilot: bool,
    pub starting_lives: u32,
    /// Ticks between the stage-clear cue and the next level.
    pub stage_clear_delay_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            autopilot: true,
            starting_lives: DEFAULT_LIVES,
            stage_clear_delay_ticks: STAGE_CLEAR_DELAY_TICKS,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be positive".into()));
        }
        Ok(())
    }
}
