//! Connect Five adventure engine.
//!
//! Five-in-a-row on a 10x10 board, with a campaign of 2000 levels whose
//! number alone decides the modifiers in play: blocked cells, mud, piece
//! capacity, vanishing pieces, shifting blocks, board rearrangement, blind
//! play and best-of-N match series. The engine owns no UI; it reports what
//! happened through [`engine::GameEvent`]s.

pub mod adventure;
pub mod ai;
pub mod board;
pub mod config;
pub mod core;
pub mod engine;
pub mod levels;
pub mod record;
pub mod utils;

pub use adventure::{AdventureProgress, LevelSession};
pub use ai::{select_move, select_move_for, AiDifficulty};
pub use board::{Board, Cell, Coord, Player, BOARD_SIZE};
pub use config::{ConfigError, EngineConfig};
pub use crate::core::constants::*;
pub use engine::{
    apply_move, apply_remote_move, reset_level, GameEvent, GamePhase, GameState, MoveError,
    MoveOutcome,
};
pub use levels::{LevelRules, MatchFormat, MatchSeries, SeriesStatus};
pub use record::{MatchLog, MoveRecord};
