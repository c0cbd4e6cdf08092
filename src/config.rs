//! Engine configuration loaded from JSON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AiDifficulty;
use crate::core::constants::{CONFIG_FILE, DEFAULT_MOVE_TIME_LIMIT_SECS};
use crate::utils::persistence::app_path;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Tunables shared by the CLI and the adventure session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds per move; 0 disables the timer
    pub move_time_limit_secs: u32,
    pub ai_difficulty: AiDifficulty,
    /// Fixed RNG seed for reproducible games
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            move_time_limit_secs: DEFAULT_MOVE_TIME_LIMIT_SECS,
            ai_difficulty: AiDifficulty::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load ~/.connect-five/config.json, or the defaults if it does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        match app_path(CONFIG_FILE) {
            Ok(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}
