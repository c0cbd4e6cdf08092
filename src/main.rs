//! Connect Five: adventure levels from the terminal.
//!
//! ## Usage
//!
//! - `connect-five rules 153` - Show the modifiers of a level
//! - `connect-five play --level 42` - Play a level against the AI
//! - `connect-five simulate --level 800 --games 20` - AI vs AI statistics
//! - `connect-five replay <log.json>` - Rebuild a recorded game

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use connect_five::core::constants::{MATCH_LOG_DIR, SNAPSHOT_FILE, TICK_INTERVAL_MS};
use connect_five::engine::GameEvent;
use connect_five::utils::build_info::version_string;
use connect_five::utils::persistence::{app_path, load_snapshot, save_snapshot};
use connect_five::{
    AdventureProgress, AiDifficulty, EngineConfig, LevelRules, LevelSession, MatchLog, MoveRecord,
    Player,
};

/// Connect Five with adventure level modifiers
#[derive(Parser)]
#[command(name = "connect-five")]
#[command(author, version = version_string(), about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.connect-five/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the modifiers of a level
    Rules {
        level: u32,
        /// Sub-game within the level's series (0-based)
        #[arg(long, default_value_t = 0)]
        match_index: u32,
    },
    /// Play a level (0 = classic) against the AI or a second local player
    Play {
        #[arg(long)]
        level: Option<u32>,
        #[arg(long, value_enum)]
        difficulty: Option<AiDifficulty>,
        /// Seconds per move, 0 = untimed
        #[arg(long)]
        time_limit: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// Both sides are entered from the keyboard
        #[arg(long)]
        two_player: bool,
        /// Continue the last saved session
        #[arg(long)]
        resume: bool,
    },
    /// Let the AI play both sides of a level
    Simulate {
        #[arg(long, default_value_t = 1)]
        level: u32,
        #[arg(long, default_value_t = 10)]
        games: u32,
        #[arg(long, value_enum)]
        difficulty: Option<AiDifficulty>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Replay a saved match log and print the final board
    Replay { path: PathBuf },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path),
        None => EngineConfig::load_default(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Rules { level, match_index } => {
            print_rules(level, match_index);
            Ok(())
        }
        Commands::Play {
            level,
            difficulty,
            time_limit,
            seed,
            two_player,
            resume,
        } => {
            let config = EngineConfig {
                move_time_limit_secs: time_limit.unwrap_or(config.move_time_limit_secs),
                ai_difficulty: difficulty.unwrap_or(config.ai_difficulty),
                seed: seed.or(config.seed),
            };
            run_play(level, &config, two_player, resume)
        }
        Commands::Simulate {
            level,
            games,
            difficulty,
            seed,
        } => {
            let difficulty = difficulty.unwrap_or(config.ai_difficulty);
            let seed = seed.or(config.seed).unwrap_or(0);
            run_simulate(level, games, difficulty, seed);
            Ok(())
        }
        Commands::Replay { path } => run_replay(&path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_rules(level: u32, match_index: u32) {
    let rules = LevelRules::for_level(level, match_index);
    println!("Level {} (game {})", rules.level, match_index + 1);
    println!("  starting player: {}", rules.starting_player.number());
    let lines = rules.describe();
    if lines.is_empty() {
        println!("  no modifiers");
    }
    for line in lines {
        println!("  - {line}");
    }
}

/// RNGs for one sub-game: the board RNG recorded in the match log and a
/// separate stream for the AI.
fn game_rngs(seed: u64, match_index: u32) -> (ChaCha8Rng, ChaCha8Rng) {
    let board_seed = seed.wrapping_add(match_index as u64);
    (
        ChaCha8Rng::seed_from_u64(board_seed),
        ChaCha8Rng::seed_from_u64(!board_seed),
    )
}

fn print_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::PieceStuck { coord } => println!("Piece stuck in mud at {coord:?}"),
            GameEvent::PiecesEvicted { reason, coords } => {
                println!("{reason:?}: removed pieces at {coords:?}")
            }
            GameEvent::BlocksAdded { coords } => println!("Blocks added at {coords:?}"),
            GameEvent::BlocksRemoved { coords } => println!("Blocks removed at {coords:?}"),
            GameEvent::BlocksShifted { count } => println!("{count} blocks shifted"),
            GameEvent::BoardRearranged { moved } => println!("Board rearranged ({moved} cells)"),
            GameEvent::GameWon { player, .. } => println!("Player {} wins!", player.number()),
            GameEvent::GameDrawn => println!("Draw."),
            GameEvent::GameTimedOut { loser } => {
                println!("Player {} ran out of time.", loser.number())
            }
            GameEvent::SeriesComplete { winner, score } => match winner {
                Some(p) => println!(
                    "Series to player {} ({}-{})",
                    p.number(),
                    score.0,
                    score.1
                ),
                None => println!("Series tied ({}-{})", score.0, score.1),
            },
            GameEvent::LevelStoryAvailable { level } => println!("~ Level {level} ~"),
            GameEvent::PiecePlaced { .. } => {}
        }
    }
}

fn parse_move(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split(|c: char| c.is_whitespace() || c == ',');
    let row = parts.next()?.trim().parse().ok()?;
    let col = parts.find(|p| !p.is_empty())?.trim().parse().ok()?;
    Some((row, col))
}

/// A fresh log for the session's current sub-game.
fn new_log(session: &LevelSession, seed: u64) -> MatchLog {
    let match_index = session.match_index();
    MatchLog::new(
        session.level,
        match_index,
        session.series.current_starter,
        seed.wrapping_add(match_index as u64),
    )
}

fn save_log(log: &MatchLog) {
    let path = app_path(MATCH_LOG_DIR).map(|dir| dir.join(log.file_name()));
    match path.and_then(|p| log.save(&p).map(|_| p)) {
        Ok(p) => info!(path = %p.display(), "match log saved"),
        Err(e) => error!("could not save match log: {e}"),
    }
}

fn run_play(
    level: Option<u32>,
    config: &EngineConfig,
    two_player: bool,
    resume: bool,
) -> io::Result<()> {
    let mut progress = AdventureProgress::load_default();
    let snapshot_path = app_path(SNAPSHOT_FILE)?;

    let (mut session, events) = if resume {
        let session: LevelSession = load_snapshot(&snapshot_path)?;
        (session, Vec::new())
    } else {
        let level = level.unwrap_or(progress.highest_unlocked);
        if level > 0 && !progress.is_unlocked(level) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "level {level} is locked (highest unlocked: {})",
                    progress.highest_unlocked
                ),
            ));
        }
        LevelSession::start(level, config)
    };
    print_events(&events);

    let seed = config.seed.unwrap_or_else(rand::random);
    let (mut rng, mut ai_rng) = game_rngs(seed, session.match_index());
    // A resumed game cannot be replayed from its seed, so it is not logged
    let mut log = (!resume).then(|| new_log(&session, seed));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut last_input = Instant::now();

    loop {
        if session.is_game_over() {
            if let Some(log) = &log {
                save_log(log);
            }
            if session.is_series_complete() {
                if progress.record_series(session.level, session.series_winner()) {
                    println!("Level {} unlocked.", progress.highest_unlocked);
                }
                progress.save_default()?;
                return Ok(());
            }
            session.next_game();
            (rng, ai_rng) = game_rngs(seed, session.match_index());
            log = Some(new_log(&session, seed));
            last_input = Instant::now();
        }

        if !two_player && session.game.current_player == Player::Two {
            let outcome = session
                .play_ai_turn(config.ai_difficulty, &mut ai_rng, &mut rng)
                .map_err(io::Error::other)?;
            println!("AI plays {:?}", outcome.placed);
            if let Some(log) = log.as_mut() {
                log.push(MoveRecord::new(outcome.player, outcome.placed));
            }
            print_events(&outcome.events);
            last_input = Instant::now();
            continue;
        }

        let view = session.game.visible_board();
        println!("\n{}", view.render(false));
        println!("{}", session.status_line());
        print!("move (row col), 'save' or 'quit'> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;

        // Time spent thinking counts against the move timer
        let elapsed_ticks = last_input.elapsed().as_millis() as u64 / TICK_INTERVAL_MS;
        last_input = Instant::now();
        for _ in 0..elapsed_ticks {
            let events = session.tick();
            if !events.is_empty() {
                print_events(&events);
                break;
            }
        }
        if session.is_game_over() {
            continue;
        }

        match line.trim() {
            "quit" | "q" => return Ok(()),
            "save" => {
                save_snapshot(&snapshot_path, &session)?;
                println!("Session saved.");
            }
            input => match parse_move(input) {
                Some((row, col)) => match session.apply_move(row, col, &mut rng) {
                    Ok(outcome) => {
                        if let Some(log) = log.as_mut() {
                            log.push(MoveRecord::new(outcome.player, outcome.placed));
                        }
                        print_events(&outcome.events);
                    }
                    Err(e) => println!("{e}"),
                },
                None => println!("Enter a move as: row col"),
            },
        }
    }
}

fn run_simulate(level: u32, games: u32, difficulty: AiDifficulty, seed: u64) {
    let config = EngineConfig {
        move_time_limit_secs: 0,
        ai_difficulty: difficulty,
        seed: Some(seed),
    };
    let mut wins = [0u32; 2];
    let mut ties = 0u32;
    let mut total_moves = 0u32;

    for game_index in 0..games {
        let base = seed.wrapping_add(game_index as u64 * 1000);
        let (mut session, _) = LevelSession::start(level, &config);
        let (mut rng, mut ai_rng) = game_rngs(base, 0);

        loop {
            while !session.is_game_over() {
                match session.play_ai_turn(difficulty, &mut ai_rng, &mut rng) {
                    Ok(_) => total_moves += 1,
                    Err(e) => {
                        error!("simulation stopped: {e}");
                        break;
                    }
                }
            }
            if session.is_series_complete() || !session.next_game() {
                break;
            }
            (rng, ai_rng) = game_rngs(base, session.match_index());
        }

        match session.series_winner() {
            Some(p) => wins[p.index()] += 1,
            None => ties += 1,
        }
    }

    println!("Level {level}, {games} series at {} difficulty", difficulty.name());
    println!("  player 1 wins: {}", wins[0]);
    println!("  player 2 wins: {}", wins[1]);
    println!("  tied:          {ties}");
    if games > 0 {
        println!("  moves/series:  {:.1}", total_moves as f64 / games as f64);
    }
}

fn run_replay(path: &Path) -> io::Result<()> {
    let log = MatchLog::load(path)?;
    let game = log
        .replay()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    println!(
        "Level {} game {} ({} moves, seed {})",
        log.level,
        log.match_index + 1,
        log.len(),
        log.seed
    );
    println!("{}", game.board.render(false));
    match game.winner() {
        Some(p) => println!("Winner: player {}", p.number()),
        None if game.phase.is_over() => println!("Draw"),
        None => println!("Unfinished"),
    }
    Ok(())
}
