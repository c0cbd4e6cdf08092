//! Connect Five board data structures.
//!
//! 10x10 board, first to get 5+ in a row wins. Cells can also be blocked by
//! level modifiers, and every piece carries an age in a parallel grid.

use serde::{Deserialize, Serialize};

/// Board size (10x10)
pub const BOARD_SIZE: usize = 10;

/// Number of cells on the board
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Pieces in a row needed to win
pub const WIN_LENGTH: u32 = 5;

/// A (row, col) position on the board.
pub type Coord = (usize, usize);

/// Player in Connect Five. Player One is the human side in adventure mode,
/// Player Two the AI (or the second local player).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    pub fn opponent(&self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 1 or 2, the numbering used by move records and the CLI.
    pub fn number(&self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Index into per-player arrays.
    pub fn index(&self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
        }
    }
}

/// Contents of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Piece(Player),
    Blocked,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_piece(&self) -> bool {
        matches!(self, Cell::Piece(_))
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Cell::Blocked)
    }

    pub fn player(&self) -> Option<Player> {
        match self {
            Cell::Piece(p) => Some(*p),
            _ => None,
        }
    }
}

/// Row-major index of a coordinate.
pub fn to_index((row, col): Coord) -> usize {
    row * BOARD_SIZE + col
}

/// Coordinate of a row-major index.
pub fn from_index(index: usize) -> Coord {
    (index / BOARD_SIZE, index % BOARD_SIZE)
}

pub fn in_bounds(row: usize, col: usize) -> bool {
    row < BOARD_SIZE && col < BOARD_SIZE
}

/// The 10x10 grid of cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    pub fn at(&self, coord: Coord) -> Cell {
        self.get(coord.0, coord.1)
    }

    /// All coordinates in row-major order.
    pub fn coords() -> impl Iterator<Item = Coord> {
        (0..CELL_COUNT).map(from_index)
    }

    /// Coordinates whose cell satisfies `pred`, in row-major order.
    pub fn coords_where<F>(&self, pred: F) -> Vec<Coord>
    where
        F: Fn(Cell) -> bool,
    {
        Self::coords().filter(|&c| pred(self.at(c))).collect()
    }

    pub fn empty_cells(&self) -> Vec<Coord> {
        self.coords_where(|c| c.is_empty())
    }

    pub fn blocked_cells(&self) -> Vec<Coord> {
        self.coords_where(|c| c.is_blocked())
    }

    pub fn count_where<F>(&self, pred: F) -> usize
    where
        F: Fn(Cell) -> bool,
    {
        self.cells.iter().flatten().filter(|&&c| pred(c)).count()
    }

    /// Number of pieces of either player.
    pub fn piece_count(&self) -> usize {
        self.count_where(|c| c.is_piece())
    }

    pub fn blocked_count(&self) -> usize {
        self.count_where(|c| c.is_blocked())
    }

    pub fn has_pieces(&self) -> bool {
        self.piece_count() > 0
    }

    /// Render as text rows. A blind render shows every cell as empty.
    pub fn render(&self, blind: bool) -> String {
        let mut out = String::from("   ");
        for col in 0..BOARD_SIZE {
            out.push_str(&format!("{col} "));
        }
        out.push('\n');
        for (row, cells) in self.cells.iter().enumerate() {
            out.push_str(&format!("{row:>2} "));
            for cell in cells {
                let ch = match cell {
                    _ if blind => '.',
                    Cell::Empty => '.',
                    Cell::Blocked => '#',
                    Cell::Piece(p) => p.symbol(),
                };
                out.push(ch);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

/// Per-cell age of the piece occupying it; 0 for every non-piece cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PieceAges {
    ages: [[u32; BOARD_SIZE]; BOARD_SIZE],
}

impl PieceAges {
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.ages[row][col]
    }

    pub fn at(&self, coord: Coord) -> u32 {
        self.get(coord.0, coord.1)
    }

    pub fn set(&mut self, row: usize, col: usize, age: u32) {
        self.ages[row][col] = age;
    }

    pub fn reset(&mut self, row: usize, col: usize) {
        self.ages[row][col] = 0;
    }
}
