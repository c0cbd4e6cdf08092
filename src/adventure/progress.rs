//! Campaign progress across levels, persisted as JSON.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::Player;
use crate::core::constants::{MAX_LEVEL, PROGRESS_FILE};
use crate::utils::persistence::{app_path, load_json_or_default, save_json};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdventureProgress {
    /// Highest level the player may start
    pub highest_unlocked: u32,
    /// Levels whose series Player One has won
    pub completed: BTreeSet<u32>,
}

impl Default for AdventureProgress {
    fn default() -> Self {
        Self {
            highest_unlocked: 1,
            completed: BTreeSet::new(),
        }
    }
}

impl AdventureProgress {
    pub fn is_unlocked(&self, level: u32) -> bool {
        (1..=self.highest_unlocked).contains(&level)
    }

    pub fn is_completed(&self, level: u32) -> bool {
        self.completed.contains(&level)
    }

    /// Record a finished series. A win for Player One completes the level and
    /// unlocks the next one. Returns true if a new level was unlocked.
    pub fn record_series(&mut self, level: u32, winner: Option<Player>) -> bool {
        if level == 0 || winner != Some(Player::One) {
            return false;
        }
        self.completed.insert(level);
        let next = (level + 1).min(MAX_LEVEL);
        if next > self.highest_unlocked {
            self.highest_unlocked = next;
            info!(level = next, "level unlocked");
            return true;
        }
        false
    }

    pub fn load(path: &Path) -> Self {
        load_json_or_default(path)
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        save_json(path, self)
    }

    /// Load ~/.connect-five/progress.json, starting fresh if it is missing.
    pub fn load_default() -> Self {
        match app_path(PROGRESS_FILE) {
            Ok(path) => Self::load(&path),
            Err(_) => Self::default(),
        }
    }

    pub fn save_default(&self) -> io::Result<()> {
        self.save(&app_path(PROGRESS_FILE)?)
    }
}
