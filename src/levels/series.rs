//! Best-of-N match series layered on top of single games.

use serde::{Deserialize, Serialize};

use crate::board::Player;

/// How many sub-games a level is played over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchFormat {
    Single,
    BestOf(u32),
}

impl MatchFormat {
    /// Multiples of 50 are best-of-5, other multiples of 10 best-of-3.
    pub fn for_level(level: u32) -> Self {
        if level % 50 == 0 {
            MatchFormat::BestOf(5)
        } else if level % 10 == 0 {
            MatchFormat::BestOf(3)
        } else {
            MatchFormat::Single
        }
    }

    pub fn max_games(&self) -> u32 {
        match self {
            MatchFormat::Single => 1,
            MatchFormat::BestOf(n) => *n,
        }
    }

    pub fn wins_needed(&self) -> u32 {
        self.max_games() / 2 + 1
    }
}

/// What the series does after a sub-game ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesStatus {
    Continue { next_index: u32, next_starter: Player },
    Complete { winner: Option<Player>, score: (u32, u32) },
}

/// Win counts and sub-game bookkeeping for one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSeries {
    pub format: MatchFormat,
    /// Wins indexed by `Player::index()`
    pub wins: [u32; 2],
    pub draws: u32,
    pub games_played: u32,
    /// Index of the active sub-game (0-based)
    pub current_index: u32,
    /// Who starts the active sub-game
    pub current_starter: Player,
}

impl MatchSeries {
    pub fn new(format: MatchFormat, first_starter: Player) -> Self {
        Self {
            format,
            wins: [0, 0],
            draws: 0,
            games_played: 0,
            current_index: 0,
            current_starter: first_starter,
        }
    }

    pub fn score(&self) -> (u32, u32) {
        (self.wins[0], self.wins[1])
    }

    pub fn is_complete(&self) -> bool {
        self.wins.iter().any(|&w| w >= self.format.wins_needed())
            || self.games_played >= self.format.max_games()
    }

    /// Leader on wins, `None` when level.
    pub fn leader(&self) -> Option<Player> {
        match self.wins[0].cmp(&self.wins[1]) {
            std::cmp::Ordering::Greater => Some(Player::One),
            std::cmp::Ordering::Less => Some(Player::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Record a finished sub-game (`None` = draw) and advance the series.
    /// The starting player alternates between sub-games.
    pub fn record(&mut self, winner: Option<Player>) -> SeriesStatus {
        if self.is_complete() {
            return SeriesStatus::Complete {
                winner: self.leader(),
                score: self.score(),
            };
        }

        match winner {
            Some(p) => self.wins[p.index()] += 1,
            None => self.draws += 1,
        }
        self.games_played += 1;

        if self.is_complete() {
            return SeriesStatus::Complete {
                winner: self.leader(),
                score: self.score(),
            };
        }

        self.current_index += 1;
        self.current_starter = self.current_starter.opponent();
        SeriesStatus::Continue {
            next_index: self.current_index,
            next_starter: self.current_starter,
        }
    }
}
