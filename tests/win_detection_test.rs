//! Five-in-a-row detection across directions, rotations and blockers.

use connect_five::board::{check_win, is_board_full, winning_pieces, Board, Cell, Coord, Player};

fn board_with(coords: &[Coord], player: Player) -> Board {
    let mut board = Board::new();
    for &(r, c) in coords {
        board.set(r, c, Cell::Piece(player));
    }
    board
}

/// Rotate a coordinate 90 degrees clockwise on the 10x10 board.
fn rotate((r, c): Coord) -> Coord {
    (c, 9 - r)
}

#[test]
fn test_horizontal_five_from_end_cell() {
    let mut board = Board::new();
    for c in 4..8 {
        board.set(4, c, Cell::Piece(Player::One));
        assert!(!check_win(&board, 4, c, Player::One));
    }
    board.set(4, 8, Cell::Piece(Player::One));
    assert!(check_win(&board, 4, 8, Player::One));
    assert_eq!(
        winning_pieces(&board, 4, 8, Player::One),
        Some(vec![(4, 4), (4, 5), (4, 6), (4, 7), (4, 8)])
    );
}

#[test]
fn test_win_is_rotation_symmetric() {
    let lines: [Vec<Coord>; 4] = [
        (0..5).map(|c| (2, c + 1)).collect(),
        (0..5).map(|r| (r + 3, 7)).collect(),
        (0..5).map(|i| (i + 1, i + 2)).collect(),
        (0..5).map(|i| (i + 4, 8 - i)).collect(),
    ];

    for line in lines {
        let mut coords = line.clone();
        for _ in 0..4 {
            let board = board_with(&coords, Player::Two);
            for &(r, c) in &coords {
                assert!(check_win(&board, r, c, Player::Two), "{coords:?} at ({r},{c})");
                assert!(!check_win(&board, r, c, Player::One));
            }
            coords = coords.into_iter().map(rotate).collect();
        }
    }
}

#[test]
fn test_win_found_from_any_cell_of_the_run() {
    let run: Vec<Coord> = (0..5).map(|i| (9 - i, i)).collect();
    let board = board_with(&run, Player::One);
    for &(r, c) in &run {
        let mut line = winning_pieces(&board, r, c, Player::One).unwrap();
        line.sort_unstable();
        let mut expected = run.clone();
        expected.sort_unstable();
        assert_eq!(line, expected);
    }
}

#[test]
fn test_block_in_run_prevents_win() {
    let mut board = board_with(&[(6, 0), (6, 1), (6, 3), (6, 4), (6, 5)], Player::One);
    board.set(6, 2, Cell::Blocked);
    assert!(!check_win(&board, 6, 3, Player::One));
}

#[test]
fn test_blocked_cells_count_toward_full_board() {
    let mut board = Board::new();
    for (i, coord) in Board::coords().enumerate() {
        let cell = if i % 2 == 0 { Cell::Blocked } else { Cell::Piece(Player::Two) };
        board.set(coord.0, coord.1, cell);
    }
    assert!(is_board_full(&board));
    board.set(0, 0, Cell::Empty);
    assert!(!is_board_full(&board));
}
