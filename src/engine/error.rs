//! Error types for move validation and state invariants.

use thiserror::Error;

use crate::board::{Coord, Player};

/// Why a move was rejected. A rejected move never changes the game state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The game is idle or already finished
    #[error("game is not active")]
    NotActive,

    /// The coordinate is outside the board
    #[error("({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    /// The cell already holds a piece
    #[error("({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    /// The cell is blocked by a level modifier
    #[error("({row}, {col}) is blocked")]
    Blocked { row: usize, col: usize },

    /// Blind play refuses mud cells even though they are not shown
    #[error("({row}, {col}) is a hidden mud cell")]
    HiddenMud { row: usize, col: usize },

    /// An externally sourced move named the wrong player
    #[error("not player {}'s turn (player {} to move)", .got.number(), .expected.number())]
    OutOfTurn { expected: Player, got: Player },
}

/// A broken engine invariant. Never expected in normal play.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("cell {0:?} has age {1} but holds no piece")]
    StaleAge(Coord, u32),

    #[error("{count} pieces on the board exceed the capacity of {cap}")]
    CapacityExceeded { count: usize, cap: usize },

    #[error("stuck entry {0:?} does not hold a piece")]
    StuckWithoutPiece(Coord),
}
