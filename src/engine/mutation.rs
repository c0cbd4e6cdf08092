//! The move transition: validation plus the ordered modifier pipeline.
//!
//! Modifiers interact, so they always run in this order:
//!
//! 1. release stuck pieces
//! 2. age pieces
//! 3. place the new piece (stuck if it landed on mud)
//! 4. count the move
//! 5. capacity eviction
//! 6. disappearing-piece eviction
//! 7. human-move block rule
//! 8. block shifting
//! 9. periodic rearrangement
//! 10. win / draw check
//! 11. turn advance

use rand::seq::index::sample;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use super::error::MoveError;
use super::events::{EvictionReason, GameEvent};
use super::state::{GamePhase, GameState};
use crate::board::{
    check_win, from_index, in_bounds, is_board_full, longest_line_through, to_index,
    winning_pieces, Board, Cell, Coord, Player, CELL_COUNT,
};
use crate::core::constants::MUD_STUCK_TURNS;
use crate::levels::rules::HumanMoveRule;

/// What an accepted move did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub player: Player,
    /// Where the piece was placed
    pub placed: Coord,
    /// Where the piece ended up after the pipeline (rearrangement can move it)
    pub final_position: Coord,
    pub events: Vec<GameEvent>,
}

/// Check a move without changing anything.
pub fn validate_move(state: &GameState, row: usize, col: usize) -> Result<(), MoveError> {
    if !state.is_active() {
        return Err(MoveError::NotActive);
    }
    if !in_bounds(row, col) {
        return Err(MoveError::OutOfBounds { row, col });
    }
    match state.board.get(row, col) {
        Cell::Piece(_) => return Err(MoveError::Occupied { row, col }),
        Cell::Blocked => return Err(MoveError::Blocked { row, col }),
        Cell::Empty => {}
    }
    if state.rules.blind && state.is_mud((row, col)) {
        return Err(MoveError::HiddenMud { row, col });
    }
    Ok(())
}

/// Apply a move for the player to move. Rejected moves leave `state` untouched.
pub fn apply_move<R: Rng>(
    state: &mut GameState,
    row: usize,
    col: usize,
    rng: &mut R,
) -> Result<MoveOutcome, MoveError> {
    validate_move(state, row, col)?;

    let player = state.current_player;
    let mut events = Vec::new();

    release_stuck_pieces(state);
    age_pieces(state);
    place_piece(state, (row, col), player, &mut events);

    state.moves_by_player[player.index()] += 1;
    state.total_moves += 1;

    enforce_capacity(state, &mut events);
    remove_disappearing_pieces(state, player, &mut events);
    if player == Player::One {
        apply_human_move_rule(state, rng, &mut events);
    }
    if state.rules.shifting_blocks {
        shift_blocks(state, &mut events);
    }
    let final_position = rearrange_board(state, (row, col), rng, &mut events);

    resolve_outcome(state, final_position, player, &mut events);

    debug_assert!(
        state.check_invariants().is_ok(),
        "invariant broken after move: {:?}",
        state.check_invariants()
    );

    Ok(MoveOutcome {
        player,
        placed: (row, col),
        final_position,
        events,
    })
}

/// Apply a move that arrived from outside (a peer or a replay), checking
/// that it names the player whose turn it is.
pub fn apply_remote_move<R: Rng>(
    state: &mut GameState,
    player: Player,
    row: usize,
    col: usize,
    rng: &mut R,
) -> Result<MoveOutcome, MoveError> {
    if state.is_active() && player != state.current_player {
        warn!(
            expected = state.current_player.number(),
            got = player.number(),
            "out-of-turn move rejected"
        );
        return Err(MoveError::OutOfTurn {
            expected: state.current_player,
            got: player,
        });
    }
    apply_move(state, row, col, rng)
}

/// Step 1: tick down mud counters, dropping those that reach zero.
fn release_stuck_pieces(state: &mut GameState) {
    state.stuck.retain(|_, turns| {
        *turns = turns.saturating_sub(1);
        *turns > 0
    });
}

/// Step 2: every surviving piece grows one turn older.
fn age_pieces(state: &mut GameState) {
    for (row, col) in state.board.coords_where(|c| c.is_piece()) {
        let age = state.ages.get(row, col);
        state.ages.set(row, col, age + 1);
    }
}

/// Step 3: the new piece starts at age 0; mud holds it for a turn.
fn place_piece(state: &mut GameState, coord: Coord, player: Player, events: &mut Vec<GameEvent>) {
    state.board.set(coord.0, coord.1, Cell::Piece(player));
    state.ages.reset(coord.0, coord.1);
    state.last_move = Some(coord);
    events.push(GameEvent::PiecePlaced { player, coord });

    if state.is_mud(coord) {
        state.stuck.insert(coord, MUD_STUCK_TURNS);
        debug!(?coord, "piece stuck in mud");
        events.push(GameEvent::PieceStuck { coord });
    }
}

/// Step 5: evict oldest pieces until the board is within capacity. The new
/// piece has age 0 and everything else is older, so it is never evicted.
fn enforce_capacity(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(cap) = state.rules.piece_capacity else {
        return;
    };
    let count = state.board.piece_count();
    if count <= cap {
        return;
    }
    let evicted: Vec<Coord> = state
        .pieces_oldest_first(None)
        .into_iter()
        .take(count - cap)
        .collect();
    for &coord in &evicted {
        state.clear_cell(coord);
    }
    debug!(?evicted, cap, "capacity eviction");
    events.push(GameEvent::PiecesEvicted {
        reason: EvictionReason::Capacity,
        coords: evicted,
    });
}

/// Step 6: on every n-th move of the mover, the opponent's oldest pieces vanish.
fn remove_disappearing_pieces(state: &mut GameState, mover: Player, events: &mut Vec<GameEvent>) {
    let Some(rule) = state.rules.disappearing else {
        return;
    };
    if state.moves_of(mover) % rule.every != 0 {
        return;
    }
    let evicted: Vec<Coord> = state
        .pieces_oldest_first(Some(mover.opponent()))
        .into_iter()
        .take(rule.count)
        .collect();
    if evicted.is_empty() {
        return;
    }
    for &coord in &evicted {
        state.clear_cell(coord);
    }
    debug!(?evicted, "disappearing pieces");
    events.push(GameEvent::PiecesEvicted {
        reason: EvictionReason::Disappearing,
        coords: evicted,
    });
}

/// Step 7: block rules driven by Player One's move counter.
fn apply_human_move_rule<R: Rng>(state: &mut GameState, rng: &mut R, events: &mut Vec<GameEvent>) {
    let Some(rule) = state.rules.human_move_rule else {
        return;
    };
    let interval = rule.interval();
    if interval == 0 || state.moves_of(Player::One) % interval != 0 {
        return;
    }

    match rule {
        HumanMoveRule::RemoveBlocks { count, .. } => {
            let mut blocks = state.board.blocked_cells();
            blocks.shuffle(rng);
            blocks.truncate(count);
            if blocks.is_empty() {
                return;
            }
            for &coord in &blocks {
                state.clear_cell(coord);
            }
            blocks.sort_unstable();
            debug!(?blocks, "blocks removed");
            events.push(GameEvent::BlocksRemoved { coords: blocks });
        }
        HumanMoveRule::Progressive(schedule) => {
            let empty = state.board.empty_cells();
            let take = schedule.blocks_per_trigger.min(empty.len());
            if take == 0 {
                return;
            }
            let mut added: Vec<Coord> = sample(rng, empty.len(), take)
                .into_iter()
                .map(|i| empty[i])
                .collect();
            added.sort_unstable();
            for &coord in &added {
                state.block_cell(coord);
            }
            debug!(?added, "progressive blocks");
            events.push(GameEvent::BlocksAdded { coords: added });
        }
        HumanMoveRule::StrategicBlock { .. } => {
            if let Some(coord) = strategic_block_cell(&state.board) {
                state.block_cell(coord);
                debug!(?coord, "strategic block");
                events.push(GameEvent::BlocksAdded { coords: vec![coord] });
            }
        }
    }
}

/// The empty cell where Player One would build the longest line; first in
/// row-major order on ties.
pub fn strategic_block_cell(board: &Board) -> Option<Coord> {
    let mut best: Option<(Coord, u32)> = None;
    for (row, col) in board.empty_cells() {
        let length = longest_line_through(board, row, col, Player::One);
        if best.map_or(true, |(_, b)| length > b) {
            best = Some(((row, col), length));
        }
    }
    best.map(|(coord, _)| coord)
}

/// Step 8: every block moves one cell forward in row-major order, wrapping
/// from the last cell to the first. An occupied target probes forward to the
/// next empty cell; with nowhere to go the block stays put.
fn shift_blocks(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let blocks = state.board.blocked_cells();
    if blocks.is_empty() {
        return;
    }
    for &(row, col) in &blocks {
        state.board.set(row, col, Cell::Empty);
    }
    for &origin in &blocks {
        let start = to_index(origin);
        let target = (1..=CELL_COUNT)
            .map(|step| from_index((start + step) % CELL_COUNT))
            .find(|&c| state.board.at(c).is_empty())
            .unwrap_or(origin);
        state.block_cell(target);
    }
    debug!(count = blocks.len(), "blocks shifted");
    events.push(GameEvent::BlocksShifted {
        count: blocks.len(),
    });
}

/// Step 9: on every n-th total move, scatter all non-empty cells to random
/// positions, each keeping its contents and age. Returns where the piece
/// placed at `placed` ended up.
fn rearrange_board<R: Rng>(
    state: &mut GameState,
    placed: Coord,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> Coord {
    let Some(every) = state.rules.rearrange_every else {
        return placed;
    };
    if every == 0 || state.total_moves % every != 0 {
        return placed;
    }

    let occupied = state.board.coords_where(|c| !c.is_empty());
    let contents: Vec<(Coord, Cell, u32)> = occupied
        .iter()
        .map(|&c| (c, state.board.at(c), state.ages.at(c)))
        .collect();
    for &coord in &occupied {
        state.board.set(coord.0, coord.1, Cell::Empty);
        state.ages.reset(coord.0, coord.1);
    }

    let targets = sample(rng, CELL_COUNT, contents.len());
    let mut final_position = placed;
    for ((origin, cell, age), index) in contents.into_iter().zip(targets) {
        let (row, col) = from_index(index);
        state.board.set(row, col, cell);
        state.ages.set(row, col, age);
        if origin == placed {
            final_position = (row, col);
        }
    }
    // Stuck entries stay keyed by coordinate; drop those no longer on a piece
    let board = &state.board;
    state.stuck.retain(|c, _| board.at(*c).is_piece());

    debug!(moved = occupied.len(), "board rearranged");
    events.push(GameEvent::BoardRearranged {
        moved: occupied.len(),
    });
    final_position
}

/// Steps 10 and 11: decide the game or hand the turn over.
fn resolve_outcome(
    state: &mut GameState,
    position: Coord,
    player: Player,
    events: &mut Vec<GameEvent>,
) {
    let (row, col) = position;
    if state.board.get(row, col) == Cell::Piece(player) && check_win(&state.board, row, col, player)
    {
        let line = winning_pieces(&state.board, row, col, player).unwrap_or_default();
        state.phase = GamePhase::Won(player);
        state.winning_line = Some(line.clone());
        state.countdown.cancel();
        info!(player = player.number(), moves = state.total_moves, "game won");
        events.push(GameEvent::GameWon { player, line });
        return;
    }

    if is_board_full(&state.board) {
        state.phase = GamePhase::Draw;
        state.countdown.cancel();
        info!(moves = state.total_moves, "game drawn");
        events.push(GameEvent::GameDrawn);
        return;
    }

    state.current_player = player.opponent();
    state.countdown.arm();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::rules::LevelRules;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    fn classic() -> GameState {
        GameState::classic(0)
    }

    #[test]
    fn test_rejects_when_idle() {
        let mut game = GameState::new(LevelRules::classic(), Player::One, 0);
        let mut rng = create_test_rng();
        assert_eq!(
            apply_move(&mut game, 0, 0, &mut rng),
            Err(MoveError::NotActive)
        );
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let mut game = classic();
        let mut rng = create_test_rng();
        assert_eq!(
            apply_move(&mut game, 10, 0, &mut rng),
            Err(MoveError::OutOfBounds { row: 10, col: 0 })
        );
    }

    #[test]
    fn test_place_and_alternate() {
        let mut game = classic();
        let mut rng = create_test_rng();
        let outcome = apply_move(&mut game, 4, 4, &mut rng).unwrap();
        assert_eq!(outcome.player, Player::One);
        assert_eq!(outcome.final_position, (4, 4));
        assert_eq!(game.board.get(4, 4), Cell::Piece(Player::One));
        assert_eq!(game.current_player, Player::Two);
        assert_eq!(game.total_moves, 1);
        assert_eq!(game.moves_of(Player::One), 1);
    }

    #[test]
    fn test_blocked_cell_rejected_without_change() {
        let mut game = classic();
        game.board.set(2, 2, Cell::Blocked);
        let before = game.clone();
        let mut rng = create_test_rng();
        assert_eq!(
            apply_move(&mut game, 2, 2, &mut rng),
            Err(MoveError::Blocked { row: 2, col: 2 })
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_occupied_cell_rejected_without_change() {
        let mut game = classic();
        let mut rng = create_test_rng();
        apply_move(&mut game, 4, 4, &mut rng).unwrap();
        apply_move(&mut game, 5, 5, &mut rng).unwrap();
        let before = game.clone();

        // Player One to move: own piece, then the opponent's
        for (row, col) in [(4, 4), (5, 5)] {
            assert_eq!(
                apply_move(&mut game, row, col, &mut rng),
                Err(MoveError::Occupied { row, col })
            );
            assert_eq!(game, before);
        }
        assert_eq!(game.ages, before.ages);
        assert_eq!(game.board.get(4, 4), Cell::Piece(Player::One));
        assert_eq!(game.board.get(5, 5), Cell::Piece(Player::Two));
    }

    #[test]
    fn test_shift_moves_block_forward() {
        let mut game = classic();
        game.rules.shifting_blocks = true;
        game.board.set(0, 3, Cell::Blocked);
        let mut events = Vec::new();
        shift_blocks(&mut game, &mut events);
        assert_eq!(game.board.blocked_cells(), vec![(0, 4)]);
    }

    #[test]
    fn test_shift_wraps_to_next_row_and_start() {
        let mut game = classic();
        game.board.set(3, 9, Cell::Blocked);
        game.board.set(9, 9, Cell::Blocked);
        let mut events = Vec::new();
        shift_blocks(&mut game, &mut events);
        assert_eq!(game.board.blocked_cells(), vec![(0, 0), (4, 0)]);
    }

    #[test]
    fn test_shift_probes_past_pieces() {
        let mut game = classic();
        game.board.set(1, 1, Cell::Blocked);
        game.board.set(1, 2, Cell::Piece(Player::One));
        game.board.set(1, 3, Cell::Piece(Player::Two));
        let mut events = Vec::new();
        shift_blocks(&mut game, &mut events);
        assert_eq!(game.board.blocked_cells(), vec![(1, 4)]);
        assert_eq!(game.board.get(1, 2), Cell::Piece(Player::One));
    }

    #[test]
    fn test_adjacent_blocks_shift_together() {
        let mut game = classic();
        game.board.set(5, 5, Cell::Blocked);
        game.board.set(5, 6, Cell::Blocked);
        let mut events = Vec::new();
        shift_blocks(&mut game, &mut events);
        assert_eq!(game.board.blocked_cells(), vec![(5, 6), (5, 7)]);
    }

    #[test]
    fn test_strategic_block_cuts_longest_line() {
        let mut board = Board::new();
        for c in 2..5 {
            board.set(6, c, Cell::Piece(Player::One));
        }
        board.set(6, 1, Cell::Piece(Player::Two));
        assert_eq!(strategic_block_cell(&board), Some((6, 5)));
    }

    #[test]
    fn test_win_cancels_countdown() {
        let mut game = GameState::classic(30);
        let mut rng = create_test_rng();
        for c in 0..4 {
            apply_move(&mut game, 0, c, &mut rng).unwrap();
            apply_move(&mut game, 9, c, &mut rng).unwrap();
        }
        let outcome = apply_move(&mut game, 0, 4, &mut rng).unwrap();
        assert_eq!(game.phase, GamePhase::Won(Player::One));
        assert!(!game.countdown.is_armed());
        assert!(outcome.events.iter().any(|e| e.is_terminal()));
        assert_eq!(
            game.winning_line,
            Some(vec![(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)])
        );
    }

    #[test]
    fn test_remote_move_out_of_turn() {
        let mut game = classic();
        let mut rng = create_test_rng();
        assert_eq!(
            apply_remote_move(&mut game, Player::Two, 3, 3, &mut rng),
            Err(MoveError::OutOfTurn {
                expected: Player::One,
                got: Player::Two
            })
        );
        assert!(apply_remote_move(&mut game, Player::One, 3, 3, &mut rng).is_ok());
    }

    #[test]
    fn test_ages_grow_each_move() {
        let mut game = classic();
        let mut rng = create_test_rng();
        apply_move(&mut game, 0, 0, &mut rng).unwrap();
        apply_move(&mut game, 5, 5, &mut rng).unwrap();
        apply_move(&mut game, 9, 0, &mut rng).unwrap();
        assert_eq!(game.ages.get(0, 0), 2);
        assert_eq!(game.ages.get(5, 5), 1);
        assert_eq!(game.ages.get(9, 0), 0);
    }
}
