//! Opponent difficulty settings.

use serde::{Deserialize, Serialize};

/// How hard the computer opponent plays.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl AiDifficulty {
    pub const ALL: [AiDifficulty; 3] = [AiDifficulty::Easy, AiDifficulty::Medium, AiDifficulty::Hard];

    /// Plies searched after the forced-move checks.
    pub fn search_depth(&self) -> i32 {
        match self {
            AiDifficulty::Easy => 1,
            AiDifficulty::Medium => 2,
            AiDifficulty::Hard => 3,
        }
    }

    /// Whether the opponent's double threats are stopped before searching.
    pub fn blocks_double_threats(&self) -> bool {
        !matches!(self, AiDifficulty::Easy)
    }

    /// Whether the AI sets up double threats of its own.
    pub fn creates_double_threats(&self) -> bool {
        matches!(self, AiDifficulty::Hard)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AiDifficulty::Easy => "Easy",
            AiDifficulty::Medium => "Medium",
            AiDifficulty::Hard => "Hard",
        }
    }
}
