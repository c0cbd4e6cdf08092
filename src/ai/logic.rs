//! Move selection: forced moves, threat handling and alpha-beta search.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::evaluation::{evaluate_board, score_move_quick, SCORE_FIVE};
use super::types::AiDifficulty;
use crate::board::{check_win, Board, Cell, Coord, Player, BOARD_SIZE};

/// Maximum candidates to evaluate at each depth (limits branching factor)
const MAX_CANDIDATES: usize = 12;

/// Pick a move for Player Two, the adventure opponent.
pub fn select_move<R: Rng>(board: &Board, difficulty: AiDifficulty, rng: &mut R) -> Option<Coord> {
    select_move_for(board, Player::Two, difficulty, rng)
}

/// Pick a move for `me`. Returns `None` only when no empty cell is left.
///
/// Order of preference: complete five, stop the opponent's five, create a
/// double threat (Hard), stop the opponent's double threat (Medium and Hard),
/// then the best move found by alpha-beta search.
pub fn select_move_for<R: Rng>(
    board: &Board,
    me: Player,
    difficulty: AiDifficulty,
    rng: &mut R,
) -> Option<Coord> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return None;
    }
    let opponent = me.opponent();
    let mut scratch = board.clone();

    if let Some(coord) = winning_cells(&mut scratch, me).first() {
        debug!(?coord, "ai completes five");
        return Some(*coord);
    }
    if let Some(coord) = winning_cells(&mut scratch, opponent).first() {
        debug!(?coord, "ai blocks five");
        return Some(*coord);
    }

    let candidates = candidate_moves(board);
    if difficulty.creates_double_threats() {
        if let Some(coord) = double_threat_cell(&mut scratch, &candidates, me) {
            debug!(?coord, "ai creates double threat");
            return Some(coord);
        }
    }
    if difficulty.blocks_double_threats() {
        if let Some(coord) = double_threat_cell(&mut scratch, &candidates, opponent) {
            debug!(?coord, "ai blocks double threat");
            return Some(coord);
        }
    }

    let best = search_best_moves(&mut scratch, me, difficulty.search_depth());
    best.choose(rng)
        .copied()
        .or_else(|| empty.choose(rng).copied())
}

/// Empty cells where `player` would complete five, in row-major order.
pub fn winning_cells(board: &mut Board, player: Player) -> Vec<Coord> {
    board
        .empty_cells()
        .into_iter()
        .filter(|&(r, c)| wins_at(board, r, c, player))
        .collect()
}

/// Whether placing at the empty cell (row, col) wins for `player`.
fn wins_at(board: &mut Board, row: usize, col: usize, player: Player) -> bool {
    board.set(row, col, Cell::Piece(player));
    let win = check_win(board, row, col, player);
    board.set(row, col, Cell::Empty);
    win
}

/// The first candidate that would leave `player` with two or more distinct
/// winning cells.
fn double_threat_cell(board: &mut Board, candidates: &[Coord], player: Player) -> Option<Coord> {
    candidates.iter().copied().find(|&(r, c)| {
        board.set(r, c, Cell::Piece(player));
        let threats = winning_cells(board, player).len();
        board.set(r, c, Cell::Empty);
        threats >= 2
    })
}

/// Empty cells within two steps of any piece, in row-major order. An empty
/// board suggests the center, or every empty cell if the center is blocked.
fn candidate_moves(board: &Board) -> Vec<Coord> {
    let mut candidates = BTreeSet::new();

    for (r, c) in board.coords_where(|cell| cell.is_piece()) {
        for dr in -2i32..=2 {
            for dc in -2i32..=2 {
                let nr = r as i32 + dr;
                let nc = c as i32 + dc;
                if nr >= 0 && nr < BOARD_SIZE as i32 && nc >= 0 && nc < BOARD_SIZE as i32 {
                    let (nr, nc) = (nr as usize, nc as usize);
                    if board.get(nr, nc).is_empty() {
                        candidates.insert((nr, nc));
                    }
                }
            }
        }
    }

    if candidates.is_empty() {
        let center = BOARD_SIZE / 2;
        if board.get(center, center).is_empty() {
            return vec![(center, center)];
        }
        return board.empty_cells();
    }

    candidates.into_iter().collect()
}

/// Candidates sorted by quick heuristic score (best first), limited to
/// MAX_CANDIDATES.
fn ordered_candidates(board: &Board, player: Player) -> Vec<Coord> {
    let mut scored: Vec<_> = candidate_moves(board)
        .into_iter()
        .map(|(r, c)| ((r, c), score_move_quick(board, r, c, player)))
        .collect();
    // Stable sort keeps row-major order among equal scores
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(MAX_CANDIDATES)
        .map(|(pos, _)| pos)
        .collect()
}

/// All root moves sharing the best search score.
fn search_best_moves(board: &mut Board, me: Player, depth: i32) -> Vec<Coord> {
    let mut best_moves = Vec::new();
    let mut best_score = i32::MIN;

    for (r, c) in ordered_candidates(board, me) {
        board.set(r, c, Cell::Piece(me));
        let score = minimax(board, me, depth - 1, i32::MIN, i32::MAX, false, (r, c));
        board.set(r, c, Cell::Empty);

        if score > best_score {
            best_score = score;
            best_moves.clear();
            best_moves.push((r, c));
        } else if score == best_score {
            best_moves.push((r, c));
        }
    }

    best_moves
}

/// Minimax with alpha-beta pruning. `last_move` was just played by the side
/// that is not to move.
fn minimax(
    board: &mut Board,
    me: Player,
    depth: i32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    last_move: Coord,
) -> i32 {
    let last_player = if maximizing { me.opponent() } else { me };
    if check_win(board, last_move.0, last_move.1, last_player) {
        return if maximizing { -SCORE_FIVE } else { SCORE_FIVE };
    }

    if depth <= 0 {
        return evaluate_board(board, me);
    }

    let mover = if maximizing { me } else { me.opponent() };
    let candidates = ordered_candidates(board, mover);
    if candidates.is_empty() {
        return 0; // Draw
    }

    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for (r, c) in candidates {
        board.set(r, c, Cell::Piece(mover));
        let eval = minimax(board, me, depth - 1, alpha, beta, !maximizing, (r, c));
        board.set(r, c, Cell::Empty);
        if maximizing {
            best = best.max(eval);
            alpha = alpha.max(eval);
        } else {
            best = best.min(eval);
            beta = beta.min(eval);
        }
        if beta <= alpha {
            break;
        }
    }
    best
}
