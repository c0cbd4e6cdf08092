//! Move records and replayable match logs.
//!
//! A log stores the seed of the board RNG used for the game. Replaying feeds
//! every recorded move back through [`apply_remote_move`] with a fresh RNG
//! from that seed, so random modifiers come out the same as in the original
//! game.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{Coord, Player};
use crate::engine::{apply_remote_move, reset_level, GameState, MoveError};
use crate::utils::persistence::save_json;

/// One accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub row: usize,
    pub col: usize,
    pub player: Player,
    pub timestamp: DateTime<Utc>,
}

impl MoveRecord {
    pub fn new(player: Player, (row, col): Coord) -> Self {
        Self {
            row,
            col,
            player,
            timestamp: Utc::now(),
        }
    }
}

/// Every move of a single (sub-)game plus what is needed to rebuild it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLog {
    pub id: Uuid,
    /// 0 for classic games
    pub level: u32,
    pub match_index: u32,
    pub starting_player: Player,
    /// Seed of the board RNG passed to every move
    pub seed: u64,
    pub started_at: DateTime<Utc>,
    pub records: Vec<MoveRecord>,
}

impl MatchLog {
    pub fn new(level: u32, match_index: u32, starting_player: Player, seed: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            match_index,
            starting_player,
            seed,
            started_at: Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rebuild the game by re-applying every record. Replays are untimed.
    pub fn replay(&self) -> Result<GameState, MoveError> {
        let mut game = reset_level(self.level, self.match_index, self.starting_player, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        for record in &self.records {
            apply_remote_move(&mut game, record.player, record.row, record.col, &mut rng)?;
        }
        Ok(game)
    }

    /// File name used when saving under the log directory.
    pub fn file_name(&self) -> String {
        format!(
            "level{}-{}-{}.json",
            self.level,
            self.match_index,
            self.started_at.format("%Y%m%d-%H%M%S")
        )
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        save_json(path, self)
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
