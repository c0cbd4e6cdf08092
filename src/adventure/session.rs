//! One adventure level played as a match series.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::{select_move_for, AiDifficulty};
use crate::board::{Board, Cell, Player};
use crate::config::EngineConfig;
use crate::engine::{
    apply_move, reset_level, GameEvent, GamePhase, GameState, MoveError, MoveOutcome,
};
use crate::levels::{LevelRules, MatchFormat, MatchSeries, SeriesStatus};
use crate::record::MoveRecord;

/// A level in progress: the series, the current sub-game and its moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSession {
    /// 0 for a classic game
    pub level: u32,
    pub series: MatchSeries,
    pub game: GameState,
    pub move_time_limit_secs: u32,
    /// Moves of the current sub-game
    pub records: Vec<MoveRecord>,
    /// Set once the current sub-game has been recorded in the series
    pub last_status: Option<SeriesStatus>,
}

impl LevelSession {
    /// Start the first sub-game of a level. Adventure levels announce their
    /// story; classic games (level 0) do not.
    pub fn start(level: u32, config: &EngineConfig) -> (Self, Vec<GameEvent>) {
        let rules = LevelRules::resolve(level, 0);
        let level = rules.level;
        let starter = rules.starting_player;
        let session = Self {
            level,
            series: MatchSeries::new(rules.format, starter),
            game: reset_level(level, 0, starter, config.move_time_limit_secs),
            move_time_limit_secs: config.move_time_limit_secs,
            records: Vec::new(),
            last_status: None,
        };
        info!(level, format = ?rules.format, "level session started");

        let mut events = Vec::new();
        if !session.game.rules.is_classic() {
            events.push(GameEvent::LevelStoryAvailable { level });
        }
        (session, events)
    }

    pub fn format(&self) -> MatchFormat {
        self.series.format
    }

    pub fn match_index(&self) -> u32 {
        self.game.rules.match_index
    }

    /// Abandon the current game and start over. Switching to another level
    /// also starts a new series.
    pub fn reset_level(&mut self, level: u32, match_index: u32, starting_player: Player) {
        let rules = LevelRules::resolve(level, match_index);
        if rules.level != self.level {
            self.level = rules.level;
            self.series = MatchSeries::new(rules.format, starting_player);
        }
        self.series.current_index = match_index;
        self.series.current_starter = starting_player;
        self.game = reset_level(
            self.level,
            match_index,
            starting_player,
            self.move_time_limit_secs,
        );
        self.records.clear();
        self.last_status = None;
        info!(level = self.level, match_index, "level reset");
    }

    /// Play a move for the side to move.
    pub fn apply_move<R: Rng>(
        &mut self,
        row: usize,
        col: usize,
        rng: &mut R,
    ) -> Result<MoveOutcome, MoveError> {
        let mut outcome = apply_move(&mut self.game, row, col, rng)?;
        self.records
            .push(MoveRecord::new(outcome.player, outcome.placed));
        self.finish_if_over(&mut outcome.events);
        Ok(outcome)
    }

    /// Let the computer play the side to move. The AI draws from `ai_rng`
    /// so that `rng` sees the same sequence as a replay of the recorded moves.
    pub fn play_ai_turn<A: Rng, R: Rng>(
        &mut self,
        difficulty: AiDifficulty,
        ai_rng: &mut A,
        rng: &mut R,
    ) -> Result<MoveOutcome, MoveError> {
        if !self.game.is_active() {
            return Err(MoveError::NotActive);
        }
        let view = self.ai_view();
        let (row, col) = select_move_for(&view, self.game.current_player, difficulty, ai_rng)
            .ok_or(MoveError::NotActive)?;
        self.apply_move(row, col, rng)
    }

    /// The board the AI searches. Mud cells are unplayable during blind
    /// play, so they are shown to the AI as blocked.
    fn ai_view(&self) -> Board {
        let mut view = self.game.board.clone();
        if self.game.rules.blind {
            for &(row, col) in &self.game.mud_zones {
                if view.get(row, col).is_empty() {
                    view.set(row, col, Cell::Blocked);
                }
            }
        }
        view
    }

    /// One timer tick for the current game.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events: Vec<GameEvent> = self.game.tick().into_iter().collect();
        self.finish_if_over(&mut events);
        events
    }

    /// Record a finished game in the series exactly once.
    fn finish_if_over(&mut self, events: &mut Vec<GameEvent>) {
        if !self.game.phase.is_over() || self.last_status.is_some() {
            return;
        }
        let status = self.series.record(self.game.winner());
        self.last_status = Some(status);
        if let SeriesStatus::Complete { winner, score } = status {
            info!(
                level = self.level,
                winner = winner.map(|p| p.number()).unwrap_or(0),
                score = ?score,
                "series complete"
            );
            events.push(GameEvent::SeriesComplete { winner, score });
        }
    }

    /// Start the next sub-game after a non-final result. Returns false when
    /// the current game is still running or the series is over.
    pub fn next_game(&mut self) -> bool {
        let Some(SeriesStatus::Continue {
            next_index,
            next_starter,
        }) = self.last_status
        else {
            return false;
        };
        self.game = reset_level(
            self.level,
            next_index,
            next_starter,
            self.move_time_limit_secs,
        );
        self.records.clear();
        self.last_status = None;
        info!(
            level = self.level,
            match_index = next_index,
            starter = next_starter.number(),
            "next game started"
        );
        true
    }

    pub fn is_game_over(&self) -> bool {
        self.game.phase.is_over()
    }

    pub fn is_series_complete(&self) -> bool {
        matches!(self.last_status, Some(SeriesStatus::Complete { .. }))
    }

    /// Winner of the completed series, if any.
    pub fn series_winner(&self) -> Option<Player> {
        match self.last_status {
            Some(SeriesStatus::Complete { winner, .. }) => winner,
            _ => None,
        }
    }

    /// Short status line for the current game.
    pub fn status_line(&self) -> String {
        let (one, two) = self.series.score();
        let phase = match self.game.phase {
            GamePhase::Idle => "waiting".to_string(),
            GamePhase::Active => format!(
                "player {} to move ({}s)",
                self.game.current_player.number(),
                self.game.time_remaining_secs()
            ),
            GamePhase::Won(p) => format!("player {} wins", p.number()),
            GamePhase::Draw => "draw".to_string(),
            GamePhase::TimedOut { loser } => format!("player {} ran out of time", loser.number()),
        };
        format!(
            "Level {} game {}/{} [{}-{}] {}",
            self.level,
            self.match_index() + 1,
            self.format().max_games(),
            one,
            two,
            phase
        )
    }
}
