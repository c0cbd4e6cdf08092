//! Game state for one (sub-)game of Connect Five.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::InvariantViolation;
use super::events::GameEvent;
use crate::board::{Board, Cell, Coord, PieceAges, Player};
use crate::core::tick::Countdown;
use crate::levels::mud::{initial_blocks, mud_zones};
use crate::levels::rules::LevelRules;

/// Lifecycle of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Idle,
    Active,
    Won(Player),
    Draw,
    TimedOut { loser: Player },
}

impl GamePhase {
    pub fn is_active(&self) -> bool {
        matches!(self, GamePhase::Active)
    }

    pub fn is_over(&self) -> bool {
        matches!(
            self,
            GamePhase::Won(_) | GamePhase::Draw | GamePhase::TimedOut { .. }
        )
    }

    /// The winning player; a timeout credits the player who was not to move.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GamePhase::Won(p) => Some(*p),
            GamePhase::TimedOut { loser } => Some(loser.opponent()),
            _ => None,
        }
    }
}

/// Main game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    /// Age of every piece, parallel to `board`
    pub ages: PieceAges,
    /// Fixed for the lifetime of the level instance
    pub mud_zones: Vec<Coord>,
    /// Pieces that landed on mud -> turns left stuck
    pub stuck: BTreeMap<Coord, u32>,
    pub current_player: Player,
    pub phase: GamePhase,
    pub countdown: Countdown,
    /// Moves made this game, indexed by `Player::index()`
    pub moves_by_player: [u32; 2],
    pub total_moves: u32,
    pub rules: LevelRules,
    /// Last move position for highlighting
    pub last_move: Option<Coord>,
    /// Winning line positions (for highlighting on game over)
    pub winning_line: Option<Vec<Coord>>,
}

impl GameState {
    /// Build an idle game with the level's mud zones and initial blocks.
    pub fn new(rules: LevelRules, starting_player: Player, move_time_limit_secs: u32) -> Self {
        let mud = mud_zones(rules.level, rules.mud_zone_count);
        let mut board = Board::new();
        for (row, col) in initial_blocks(rules.level, rules.match_index, rules.initial_blocks, &mud)
        {
            board.set(row, col, Cell::Blocked);
        }

        Self {
            board,
            ages: PieceAges::default(),
            mud_zones: mud,
            stuck: BTreeMap::new(),
            current_player: starting_player,
            phase: GamePhase::Idle,
            countdown: Countdown::from_seconds(move_time_limit_secs),
            moves_by_player: [0, 0],
            total_moves: 0,
            rules,
            last_move: None,
            winning_line: None,
        }
    }

    /// An active plain game with no level modifiers.
    pub fn classic(move_time_limit_secs: u32) -> Self {
        let mut game = Self::new(LevelRules::classic(), Player::One, move_time_limit_secs);
        game.start();
        game
    }

    /// Idle -> Active. Arms the countdown for the first move.
    pub fn start(&mut self) {
        if self.phase != GamePhase::Idle {
            return;
        }
        self.phase = GamePhase::Active;
        self.countdown.arm();
        info!(
            level = self.rules.level,
            match_index = self.rules.match_index,
            starter = self.current_player.number(),
            "game started"
        );
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn winner(&self) -> Option<Player> {
        self.phase.winner()
    }

    /// 0 = none, 1 or 2 = winning player.
    pub fn winner_number(&self) -> u8 {
        self.winner().map(|p| p.number()).unwrap_or(0)
    }

    pub fn moves_of(&self, player: Player) -> u32 {
        self.moves_by_player[player.index()]
    }

    pub fn is_mud(&self, coord: Coord) -> bool {
        self.mud_zones.contains(&coord)
    }

    pub fn time_remaining_secs(&self) -> u32 {
        self.countdown.remaining_seconds()
    }

    /// The board as the human should see it: blank during blind play.
    pub fn visible_board(&self) -> Board {
        if self.rules.blind && self.is_active() {
            Board::new()
        } else {
            self.board.clone()
        }
    }

    /// One cooperative timer tick. Expiry while active ends the game with the
    /// player to move as the loser, whatever the board holds.
    pub fn tick(&mut self) -> Option<GameEvent> {
        if !self.is_active() || !self.countdown.tick() {
            return None;
        }
        let loser = self.current_player;
        self.phase = GamePhase::TimedOut { loser };
        self.countdown.cancel();
        info!(loser = loser.number(), "move timer expired");
        Some(GameEvent::GameTimedOut { loser })
    }

    /// Advance `ticks` timer ticks, stopping at the first expiry.
    pub fn advance_ticks(&mut self, ticks: u32) -> Option<GameEvent> {
        (0..ticks).find_map(|_| self.tick())
    }

    /// Empty a cell, resetting its age and dropping any stuck entry.
    pub(crate) fn clear_cell(&mut self, (row, col): Coord) {
        self.board.set(row, col, Cell::Empty);
        self.ages.reset(row, col);
        self.stuck.remove(&(row, col));
    }

    /// Block a cell, resetting its age.
    pub(crate) fn block_cell(&mut self, (row, col): Coord) {
        self.board.set(row, col, Cell::Blocked);
        self.ages.reset(row, col);
        self.stuck.remove(&(row, col));
    }

    /// Pieces of `owner` (or every piece) ordered oldest first, ties broken
    /// in row-major order.
    pub(crate) fn pieces_oldest_first(&self, owner: Option<Player>) -> Vec<Coord> {
        let mut pieces = self.board.coords_where(|cell| match (cell, owner) {
            (Cell::Piece(_), None) => true,
            (Cell::Piece(p), Some(o)) => p == o,
            _ => false,
        });
        // Stable sort keeps row-major order among equal ages
        pieces.sort_by(|a, b| self.ages.at(*b).cmp(&self.ages.at(*a)));
        pieces
    }

    /// Verify the age grid, stuck map and capacity agree with the board.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for coord in Board::coords() {
            let age = self.ages.at(coord);
            if age > 0 && !self.board.at(coord).is_piece() {
                return Err(InvariantViolation::StaleAge(coord, age));
            }
        }
        if let Some(cap) = self.rules.piece_capacity {
            let count = self.board.piece_count();
            if count > cap {
                return Err(InvariantViolation::CapacityExceeded { count, cap });
            }
        }
        if let Some(coord) = self
            .stuck
            .keys()
            .find(|&&c| !self.board.at(c).is_piece())
        {
            return Err(InvariantViolation::StuckWithoutPiece(*coord));
        }
        Ok(())
    }
}

/// Fresh active game for an adventure level (level 0 plays classic rules).
/// Any previous state for the level is simply dropped by the caller.
pub fn reset_level(
    level: u32,
    match_index: u32,
    starting_player: Player,
    move_time_limit_secs: u32,
) -> GameState {
    let mut game = GameState::new(
        LevelRules::resolve(level, match_index),
        starting_player,
        move_time_limit_secs,
    );
    game.start();
    game
}
