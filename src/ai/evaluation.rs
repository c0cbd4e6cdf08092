//! Static board evaluation for the search.
//!
//! Every window of five cells along a row, column or diagonal is scored for
//! each player. A window containing an opposing piece or a blocked cell can
//! never become five in a row, so it scores nothing.

use crate::board::{Board, Cell, Player, BOARD_SIZE, DIRECTIONS};

/// Score values for different patterns
pub const SCORE_FIVE: i32 = 100_000;
pub const SCORE_OPEN_FOUR: i32 = 10_000;
pub const SCORE_FOUR: i32 = 1_000;
pub const SCORE_THREE: i32 = 500;
pub const SCORE_TWO: i32 = 50;
const SCORE_CENTER_BONUS: i32 = 5;

/// Evaluate the board from `me`'s perspective.
/// Positive = good for `me`, negative = good for the opponent.
pub fn evaluate_board(board: &Board, me: Player) -> i32 {
    let mut score = evaluate_all_lines(board, me) - evaluate_all_lines(board, me.opponent());

    // Small bonus for center control
    let center = BOARD_SIZE / 2;
    let start = center.saturating_sub(2);
    let end = (center + 1).min(BOARD_SIZE - 1);
    for row in start..=end {
        for col in start..=end {
            match board.get(row, col) {
                Cell::Piece(p) if p == me => score += SCORE_CENTER_BONUS,
                Cell::Piece(_) => score -= SCORE_CENTER_BONUS,
                _ => {}
            }
        }
    }

    score
}

/// Sum window scores over every window of five on the board. Each window is
/// visited once, from its first cell along one of the four directions.
fn evaluate_all_lines(board: &Board, player: Player) -> i32 {
    let mut score = 0;
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            for (dr, dc) in DIRECTIONS {
                if let Some(window) = window_from(board, row, col, dr, dc) {
                    score += score_window(&window, player);
                }
            }
        }
    }
    score
}

/// The five cells starting at (row, col) in direction (dr, dc), if they all
/// lie on the board.
fn window_from(board: &Board, row: usize, col: usize, dr: i32, dc: i32) -> Option<[Cell; 5]> {
    let last_r = row as i32 + dr * 4;
    let last_c = col as i32 + dc * 4;
    let bound = 0..BOARD_SIZE as i32;
    if !bound.contains(&last_r) || !bound.contains(&last_c) {
        return None;
    }
    let mut window = [Cell::Empty; 5];
    for (i, cell) in window.iter_mut().enumerate() {
        let r = row as i32 + dr * i as i32;
        let c = col as i32 + dc * i as i32;
        *cell = board.get(r as usize, c as usize);
    }
    Some(window)
}

/// Score a window of 5 cells for patterns.
fn score_window(window: &[Cell], player: Player) -> i32 {
    let own = window.iter().filter(|&&c| c == Cell::Piece(player)).count();
    let empty = window.iter().filter(|c| c.is_empty()).count();

    // Opponent pieces and blocks both make the window dead
    if own + empty < 5 {
        return 0;
    }

    match own {
        5 => SCORE_FIVE,
        4 => SCORE_FOUR,
        3 => SCORE_THREE,
        2 => SCORE_TWO,
        _ => 0,
    }
}

/// Quick score for a single move, looking only at the lines through it.
/// Used for move ordering, not as a search leaf value.
pub fn score_move_quick(board: &Board, row: usize, col: usize, player: Player) -> i32 {
    let mut score = 0;
    let opponent = player.opponent();

    for (dr, dc) in DIRECTIONS {
        let (own, other) = count_line_window(board, row, col, dr, dc, player);
        if other == 0 {
            score += match own.min(4) {
                4 => SCORE_FIVE,
                3 => SCORE_OPEN_FOUR,
                2 => SCORE_THREE,
                1 => SCORE_TWO,
                _ => 0,
            };
        } else if own == 0 {
            // Placing here would break an opposing line
            let (theirs, _) = count_line_window(board, row, col, dr, dc, opponent);
            score += match theirs.min(4) {
                4 => SCORE_FIVE / 2,
                3 => SCORE_OPEN_FOUR / 2,
                2 => SCORE_THREE / 2,
                _ => 0,
            };
        }
    }

    // Small bonus for center proximity
    let center = BOARD_SIZE as i32 / 2;
    let dist = (row as i32 - center).abs() + (col as i32 - center).abs();
    score + (BOARD_SIZE as i32 - dist) * 2
}

/// Count cells within four steps of (row, col) along one direction.
/// Returns (own pieces, opposing pieces or blocks).
fn count_line_window(
    board: &Board,
    row: usize,
    col: usize,
    dr: i32,
    dc: i32,
    player: Player,
) -> (i32, i32) {
    let mut own = 0;
    let mut other = 0;

    for offset in -4i32..=4 {
        if offset == 0 {
            continue;
        }
        let r = row as i32 + dr * offset;
        let c = col as i32 + dc * offset;
        if r >= 0 && r < BOARD_SIZE as i32 && c >= 0 && c < BOARD_SIZE as i32 {
            match board.get(r as usize, c as usize) {
                Cell::Piece(p) if p == player => own += 1,
                Cell::Piece(_) | Cell::Blocked => other += 1,
                Cell::Empty => {}
            }
        }
    }

    (own, other)
}
