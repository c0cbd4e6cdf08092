//! Events produced by the engine for presentation and transport layers.

use serde::{Deserialize, Serialize};

use crate::board::{Coord, Player};

/// Why pieces were taken off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionReason {
    Capacity,
    Disappearing,
}

/// A single thing that happened during a move, tick or series transition.
///
/// The engine never touches UI types; callers map these to rendering, sound
/// or network messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    // ── Board ───────────────────────────────────────────────────
    PiecePlaced { player: Player, coord: Coord },
    PieceStuck { coord: Coord },
    PiecesEvicted { reason: EvictionReason, coords: Vec<Coord> },
    BlocksAdded { coords: Vec<Coord> },
    BlocksRemoved { coords: Vec<Coord> },
    BlocksShifted { count: usize },
    BoardRearranged { moved: usize },

    // ── Outcomes ────────────────────────────────────────────────
    GameWon { player: Player, line: Vec<Coord> },
    GameDrawn,
    GameTimedOut { loser: Player },
    SeriesComplete { winner: Option<Player>, score: (u32, u32) },

    // ── Advisory ────────────────────────────────────────────────
    LevelStoryAvailable { level: u32 },
}

impl GameEvent {
    /// Whether this event ends the current game.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameEvent::GameWon { .. } | GameEvent::GameDrawn | GameEvent::GameTimedOut { .. }
        )
    }
}
