//! Board representation and five-in-a-row detection.

pub mod types;
pub mod win;

pub use types::*;
pub use win::{check_win, is_board_full, longest_line_through, winning_pieces, DIRECTIONS};
