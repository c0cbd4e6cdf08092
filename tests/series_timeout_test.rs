//! Turn timer, series bookkeeping and the adventure session loop.

use connect_five::adventure::{AdventureProgress, LevelSession};
use connect_five::board::{Cell, Player};
use connect_five::engine::{GameEvent, GamePhase, GameState};
use connect_five::levels::{MatchFormat, MatchSeries, SeriesStatus};
use connect_five::{EngineConfig, TICKS_PER_SECOND};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn config(limit: u32) -> EngineConfig {
    EngineConfig {
        move_time_limit_secs: limit,
        ..EngineConfig::default()
    }
}

#[test]
fn test_timeout_credits_opponent_regardless_of_board() {
    let mut game = GameState::classic(3);
    // Player One is to move and would be winning on the board
    for c in 0..4 {
        game.board.set(2, c, Cell::Piece(Player::One));
    }
    let event = game.advance_ticks(3 * TICKS_PER_SECOND);
    assert_eq!(event, Some(GameEvent::GameTimedOut { loser: Player::One }));
    assert_eq!(game.phase, GamePhase::TimedOut { loser: Player::One });
    assert_eq!(game.winner(), Some(Player::Two));
    assert!(!game.countdown.is_armed());
}

#[test]
fn test_countdown_rearms_for_each_turn() {
    let mut game = GameState::classic(2);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    game.advance_ticks(15);
    connect_five::apply_move(&mut game, 5, 5, &mut rng).unwrap();
    assert_eq!(game.countdown.remaining_ticks(), 20);
    assert!(game.advance_ticks(19).is_none());
    assert_eq!(
        game.tick(),
        Some(GameEvent::GameTimedOut { loser: Player::Two })
    );
}

#[test]
fn test_best_of_five_ends_early_on_three_wins() {
    let mut series = MatchSeries::new(MatchFormat::BestOf(5), Player::One);
    let mut starters = vec![series.current_starter];
    for _ in 0..2 {
        match series.record(Some(Player::One)) {
            SeriesStatus::Continue { next_starter, .. } => starters.push(next_starter),
            other => panic!("series ended early: {other:?}"),
        }
    }
    assert_eq!(starters, vec![Player::One, Player::Two, Player::One]);
    assert_eq!(
        series.record(Some(Player::One)),
        SeriesStatus::Complete {
            winner: Some(Player::One),
            score: (3, 0)
        }
    );
}

#[test]
fn test_best_of_three_with_draw_runs_to_max_games() {
    let mut series = MatchSeries::new(MatchFormat::BestOf(3), Player::Two);
    assert!(matches!(series.record(None), SeriesStatus::Continue { next_index: 1, .. }));
    assert!(matches!(
        series.record(Some(Player::Two)),
        SeriesStatus::Continue { next_index: 2, .. }
    ));
    assert_eq!(
        series.record(Some(Player::One)),
        SeriesStatus::Complete {
            winner: None,
            score: (1, 1)
        }
    );
}

#[test]
fn test_session_timeouts_complete_best_of_three() {
    // Level 30: best of 3, Player One starts the first game
    let (mut session, events) = LevelSession::start(30, &config(1));
    assert_eq!(events, vec![GameEvent::LevelStoryAvailable { level: 30 }]);
    assert_eq!(session.format(), MatchFormat::BestOf(3));

    let mut all_events = Vec::new();
    loop {
        for _ in 0..TICKS_PER_SECOND {
            all_events.extend(session.tick());
        }
        if session.is_series_complete() || !session.next_game() {
            break;
        }
    }

    // Game 1: One times out, game 2: Two times out, game 3: One times out
    assert!(session.is_series_complete());
    assert_eq!(session.series.score(), (1, 2));
    assert_eq!(session.series_winner(), Some(Player::Two));
    assert_eq!(session.match_index(), 2);
    let timeouts = all_events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameTimedOut { .. }))
        .count();
    assert_eq!(timeouts, 3);
    assert!(all_events.contains(&GameEvent::SeriesComplete {
        winner: Some(Player::Two),
        score: (1, 2)
    }));
}

#[test]
fn test_series_win_unlocks_next_level() {
    let (mut session, _) = LevelSession::start(12, &config(0));
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    for c in 0..4 {
        session.apply_move(1, c, &mut rng).unwrap();
        session.apply_move(8, c, &mut rng).unwrap();
    }
    let outcome = session.apply_move(1, 4, &mut rng).unwrap();
    assert!(outcome.events.contains(&GameEvent::SeriesComplete {
        winner: Some(Player::One),
        score: (1, 0)
    }));

    let mut progress = AdventureProgress {
        highest_unlocked: 12,
        ..AdventureProgress::default()
    };
    assert!(progress.record_series(session.level, session.series_winner()));
    assert_eq!(progress.highest_unlocked, 13);
}

