//! Move validation, the modifier pipeline and per-game state.

#![allow(unused_imports)]

pub mod error;
pub mod events;
pub mod mutation;
pub mod state;

pub use error::{InvariantViolation, MoveError};
pub use events::{EvictionReason, GameEvent};
pub use mutation::{apply_move, apply_remote_move, strategic_block_cell, validate_move, MoveOutcome};
pub use state::{reset_level, GamePhase, GameState};
