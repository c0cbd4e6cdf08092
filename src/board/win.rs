//! Five-in-a-row detection shared by every game mode.

use super::types::{Board, Cell, Coord, Player, BOARD_SIZE, WIN_LENGTH};

/// Directions to check for lines: (row_delta, col_delta)
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal down-right
    (1, -1), // Diagonal down-left
];

/// Check if the piece at (row, col) completes 5+ in a row for the given player.
/// Assumes the piece is already placed. Overlines count as wins.
pub fn check_win(board: &Board, row: usize, col: usize, player: Player) -> bool {
    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| line_length(board, row, col, dr, dc, player) >= WIN_LENGTH)
}

/// The full contiguous run through (row, col) in the first winning direction,
/// ordered from one end to the other.
pub fn winning_pieces(board: &Board, row: usize, col: usize, player: Player) -> Option<Vec<Coord>> {
    for (dr, dc) in DIRECTIONS {
        if line_length(board, row, col, dr, dc, player) < WIN_LENGTH {
            continue;
        }
        let back = count_direction(board, row, col, -dr, -dc, player) as i32;
        let total = line_length(board, row, col, dr, dc, player) as i32;
        let start_r = row as i32 - dr * back;
        let start_c = col as i32 - dc * back;
        let run = (0..total)
            .map(|i| ((start_r + dr * i) as usize, (start_c + dc * i) as usize))
            .collect();
        return Some(run);
    }
    None
}

/// Count consecutive pieces in both directions from (row, col), including
/// the center cell.
pub fn line_length(
    board: &Board,
    row: usize,
    col: usize,
    dr: i32,
    dc: i32,
    player: Player,
) -> u32 {
    let mut count = 1; // Count the center piece

    // Count in positive direction
    count += count_direction(board, row, col, dr, dc, player);
    // Count in negative direction
    count += count_direction(board, row, col, -dr, -dc, player);

    count
}

/// Longest line the player would hold through (row, col) if a piece stood
/// there, over all four directions.
pub fn longest_line_through(board: &Board, row: usize, col: usize, player: Player) -> u32 {
    DIRECTIONS
        .iter()
        .map(|&(dr, dc)| line_length(board, row, col, dr, dc, player))
        .max()
        .unwrap_or(1)
}

/// Count consecutive pieces in one direction from (row, col), excluding center.
/// Stops at the edge, an opposing piece, an empty cell or a block.
fn count_direction(
    board: &Board,
    row: usize,
    col: usize,
    dr: i32,
    dc: i32,
    player: Player,
) -> u32 {
    let mut count = 0;
    let mut r = row as i32 + dr;
    let mut c = col as i32 + dc;

    while r >= 0 && r < BOARD_SIZE as i32 && c >= 0 && c < BOARD_SIZE as i32 {
        if board.get(r as usize, c as usize) == Cell::Piece(player) {
            count += 1;
            r += dr;
            c += dc;
        } else {
            break;
        }
    }
    count
}

/// Check if the board is full (draw condition). Blocked cells count as full.
pub fn is_board_full(board: &Board) -> bool {
    board.count_where(|c| c.is_empty()) == 0
}
