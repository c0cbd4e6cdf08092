//! The ordered modifier pipeline driven through `apply_move`.

use connect_five::board::{Cell, Coord, Player};
use connect_five::engine::{
    apply_move, reset_level, strategic_block_cell, EvictionReason, GameEvent, GamePhase,
    GameState, MoveError,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn create_test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

/// Empty, non-mud cells in row-major order.
fn free_cells(game: &GameState) -> Vec<Coord> {
    game.board
        .empty_cells()
        .into_iter()
        .filter(|&c| !game.is_mud(c))
        .collect()
}

/// Apply a move that must be accepted and return its events.
fn play(game: &mut GameState, coord: Coord, rng: &mut ChaCha8Rng) -> Vec<GameEvent> {
    apply_move(game, coord.0, coord.1, rng).unwrap().events
}

#[test]
fn test_progressive_level_adds_block_after_five_human_moves() {
    let mut rng = create_test_rng();
    let mut game = reset_level(53, 0, Player::Two, 0);
    assert_eq!(game.current_player, Player::Two);
    let start_blocks = game.board.blocked_count();

    let ai_cells = [(9, 0), (9, 2), (9, 4), (9, 6), (9, 8)];
    let human_cells = [(0, 0), (0, 2), (0, 4), (0, 6), (0, 8)];
    for i in 0..5 {
        play(&mut game, ai_cells[i], &mut rng);
        let events = play(&mut game, human_cells[i], &mut rng);
        if i < 4 {
            assert_eq!(game.board.blocked_count(), start_blocks);
        } else {
            assert!(events
                .iter()
                .any(|e| matches!(e, GameEvent::BlocksAdded { coords } if coords.len() == 1)));
        }
    }

    assert!(game.is_active());
    assert_eq!(game.moves_of(Player::One), 5);
    assert_eq!(game.board.blocked_count(), start_blocks + 1);
}

#[test]
fn test_remove_blocks_level_clears_two_every_third_human_move() {
    let mut rng = create_test_rng();
    let mut game = reset_level(404, 0, Player::Two, 0);
    assert_eq!(game.board.blocked_count(), 8);

    for i in 1..=3 {
        let ai = free_cells(&game)[0];
        play(&mut game, ai, &mut rng);
        let blocks_before = game.board.blocked_cells();
        let human = free_cells(&game)[0];
        let events = play(&mut game, human, &mut rng);
        if i < 3 {
            assert_eq!(game.board.blocked_cells(), blocks_before);
            assert!(!events
                .iter()
                .any(|e| matches!(e, GameEvent::BlocksRemoved { .. })));
        } else {
            let removed = events
                .iter()
                .find_map(|e| match e {
                    GameEvent::BlocksRemoved { coords } => Some(coords.clone()),
                    _ => None,
                })
                .expect("third human move removes blocks");
            assert_eq!(removed.len(), 2);
            for coord in removed {
                assert!(blocks_before.contains(&coord));
                assert_eq!(game.board.at(coord), Cell::Empty);
            }
        }
    }

    assert!(game.is_active());
    assert_eq!(game.moves_of(Player::One), 3);
    assert_eq!(game.board.blocked_count(), 6);
}

#[test]
fn test_strategic_level_blocks_best_cell_every_fourth_human_move() {
    let mut rng = create_test_rng();
    let mut game = reset_level(509, 0, Player::Two, 0);
    let start_blocks = game.board.blocked_count();
    assert_eq!(start_blocks, 16);

    for i in 1..=4 {
        let ai = free_cells(&game)[0];
        play(&mut game, ai, &mut rng);
        let human = free_cells(&game)[0];
        let mut expected = game.board.clone();
        expected.set(human.0, human.1, Cell::Piece(Player::One));
        let events = play(&mut game, human, &mut rng);
        if i < 4 {
            assert_eq!(game.board.blocked_count(), start_blocks);
            assert!(!events
                .iter()
                .any(|e| matches!(e, GameEvent::BlocksAdded { .. })));
        } else {
            let target = strategic_block_cell(&expected).unwrap();
            assert!(events.contains(&GameEvent::BlocksAdded {
                coords: vec![target]
            }));
            assert_eq!(game.board.at(target), Cell::Blocked);
        }
    }

    assert!(game.is_active());
    assert_eq!(game.board.blocked_count(), start_blocks + 1);
}

#[test]
fn test_disappearing_removes_oldest_opponent_pieces() {
    let mut rng = create_test_rng();
    let mut game = reset_level(1000, 0, Player::One, 0);
    assert!(game.rules.disappearing.is_some());

    // Spread the pieces out so no line can form
    let cells: Vec<Coord> = free_cells(&game).into_iter().step_by(7).collect();
    let (p1, p2): (Vec<Coord>, Vec<Coord>) = (
        cells.iter().copied().step_by(2).collect(),
        cells.iter().copied().skip(1).step_by(2).collect(),
    );

    for i in 0..3 {
        play(&mut game, p1[i], &mut rng);
        play(&mut game, p2[i], &mut rng);
    }
    assert_eq!(game.board.count_where(|c| c == Cell::Piece(Player::Two)), 3);

    let events = play(&mut game, p1[3], &mut rng);
    assert!(events.contains(&GameEvent::PiecesEvicted {
        reason: EvictionReason::Disappearing,
        coords: vec![p2[0], p2[1]],
    }));
    for coord in [p2[0], p2[1]] {
        assert_eq!(game.board.at(coord), Cell::Empty);
        assert_eq!(game.ages.at(coord), 0);
    }
    assert_eq!(game.board.at(p2[2]), Cell::Piece(Player::Two));
    assert_eq!(game.board.count_where(|c| c == Cell::Piece(Player::One)), 4);
}

#[test]
fn test_mud_sticks_piece_for_one_turn() {
    let mut rng = create_test_rng();
    let mut game = reset_level(200, 0, Player::One, 0);
    assert_eq!(game.mud_zones.len(), 5);
    let mud = game.mud_zones[0];

    let events = play(&mut game, mud, &mut rng);
    assert!(events.contains(&GameEvent::PieceStuck { coord: mud }));
    assert_eq!(game.stuck.get(&mud), Some(&1));

    let reply = free_cells(&game)[0];
    play(&mut game, reply, &mut rng);
    assert!(game.stuck.is_empty());
    assert_eq!(game.board.at(mud), Cell::Piece(Player::One));
}

#[test]
fn test_capacity_evicts_oldest_and_never_the_new_piece() {
    let mut rng = create_test_rng();
    let mut game = GameState::classic(0);
    game.rules.piece_capacity = Some(3);

    let moves = [(0, 0), (9, 9), (0, 2), (9, 7), (0, 4), (9, 5)];
    for (i, &coord) in moves.iter().enumerate() {
        play(&mut game, coord, &mut rng);
        assert!(game.board.piece_count() <= 3);
        assert!(game.board.at(coord).is_piece(), "new piece {i} evicted");
        assert!(game.check_invariants().is_ok());
    }
    // Only the three newest remain
    let remaining: Vec<Coord> = game.board.coords_where(|c| c.is_piece());
    assert_eq!(remaining, vec![(0, 4), (9, 5), (9, 7)]);
}

#[test]
fn test_rearrangement_preserves_cells_and_ages() {
    let mut rng = create_test_rng();
    let mut game = GameState::classic(0);
    game.rules.rearrange_every = Some(3);
    for coord in [(5, 0), (5, 1), (2, 8)] {
        game.board.set(coord.0, coord.1, Cell::Blocked);
    }

    play(&mut game, (0, 0), &mut rng);
    play(&mut game, (9, 9), &mut rng);
    let outcome = apply_move(&mut game, 4, 4, &mut rng).unwrap();
    assert!(outcome
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::BoardRearranged { moved: 6 })));

    assert_eq!(game.board.blocked_count(), 3);
    assert_eq!(game.board.count_where(|c| c == Cell::Piece(Player::One)), 2);
    assert_eq!(game.board.count_where(|c| c == Cell::Piece(Player::Two)), 1);

    let mut ages: Vec<u32> = game
        .board
        .coords_where(|c| c.is_piece())
        .into_iter()
        .map(|c| game.ages.at(c))
        .collect();
    ages.sort_unstable();
    assert_eq!(ages, vec![0, 1, 2]);

    let (r, c) = outcome.final_position;
    assert_eq!(game.board.get(r, c), Cell::Piece(Player::One));
    assert_eq!(game.ages.get(r, c), 0);
    assert!(game.check_invariants().is_ok());
}

#[test]
fn test_shifting_level_moves_blocks_every_move() {
    let mut rng = create_test_rng();
    let mut game = reset_level(257, 0, Player::Two, 0);
    assert!(game.rules.shifting_blocks);
    let before = game.board.blocked_cells();
    let target = free_cells(&game)[50];

    let events = play(&mut game, target, &mut rng);
    assert!(events.contains(&GameEvent::BlocksShifted {
        count: before.len()
    }));
    assert_eq!(game.board.blocked_count(), before.len());
    assert_ne!(game.board.blocked_cells(), before);
}

#[test]
fn test_blind_play_rejects_hidden_mud() {
    let mut rng = create_test_rng();
    let mut game = reset_level(200, 1, Player::Two, 0);
    assert!(game.rules.blind);
    let mud = game.mud_zones[2];
    let before = game.clone();
    assert_eq!(
        apply_move(&mut game, mud.0, mud.1, &mut rng),
        Err(MoveError::HiddenMud {
            row: mud.0,
            col: mud.1
        })
    );
    assert_eq!(game, before);
}

#[test]
fn test_rejected_moves_after_game_end() {
    let mut rng = create_test_rng();
    let mut game = GameState::classic(0);
    for c in 0..4 {
        play(&mut game, (3, c), &mut rng);
        play(&mut game, (6, c), &mut rng);
    }
    play(&mut game, (3, 4), &mut rng);
    assert_eq!(game.phase, GamePhase::Won(Player::One));
    assert_eq!(apply_move(&mut game, 8, 8, &mut rng), Err(MoveError::NotActive));
}

#[test]
fn test_ages_increase_monotonically_until_removed() {
    let mut rng = create_test_rng();
    let mut game = GameState::classic(0);
    let cells = [(1, 1), (8, 8), (1, 3), (8, 6), (1, 5), (8, 4), (3, 1), (6, 8)];
    let mut previous = game.ages.clone();
    for &coord in &cells {
        play(&mut game, coord, &mut rng);
        for (r, c) in game.board.coords_where(|cell| cell.is_piece()) {
            if (r, c) != coord {
                assert_eq!(game.ages.get(r, c), previous.get(r, c) + 1);
            }
        }
        previous = game.ages.clone();
    }
}
