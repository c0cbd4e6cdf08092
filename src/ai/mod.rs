//! Heuristic computer opponent.

#![allow(unused_imports)]

pub mod evaluation;
pub mod logic;
pub mod types;

pub use evaluation::evaluate_board;
pub use logic::{select_move, select_move_for, winning_cells};
pub use types::AiDifficulty;
