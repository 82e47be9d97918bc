mod config;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slidegrid::{
    format_board, Direction, EngineConfig, GameEngine, GameSnapshot, JsonFileStore, MemoryStore,
    ScoreStore, SystemClock, Tile,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

#[derive(Parser, Debug)]
struct Args {
    /// Board side length.
    #[arg(long, default_value_t = 4)]
    size: usize,
    /// Winning tile value.
    #[arg(long, default_value_t = 2048)]
    winning_tile: u32,
    /// RNG seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,
    /// Best-score file (JSON). Omit to keep scores for this session only.
    #[arg(long)]
    best_file: Option<PathBuf>,
    /// TOML config file; takes precedence over --size/--winning-tile/--best-file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Tracing filter, e.g. "info", "debug".
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(args.log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (engine_cfg, best_file) = match &args.config {
        Some(path) => {
            let cfg = Config::from_toml(path)
                .map_err(|err| anyhow!("failed to load {}: {err}", path.display()))?;
            (cfg.engine, cfg.best_file)
        }
        None => (
            EngineConfig {
                size: args.size,
                winning_tile: args.winning_tile,
            },
            args.best_file.clone(),
        ),
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let store: Box<dyn ScoreStore> = match best_file {
        Some(path) => Box::new(JsonFileStore::new(path, engine_cfg.store_key())),
        None => Box::new(MemoryStore::default()),
    };

    let mut engine = GameEngine::new(engine_cfg, rng, store, SystemClock)?;
    info!(
        size = engine_cfg.size,
        winning_tile = engine_cfg.winning_tile,
        "starting game"
    );

    let update = engine.new_game();
    render(&update.state, &update.tiles);
    print_help();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let command = line.trim().to_ascii_lowercase();
        let direction = match command.as_str() {
            "w" | "up" => Some(Direction::Up),
            "s" | "down" => Some(Direction::Down),
            "a" | "left" => Some(Direction::Left),
            "d" | "right" => Some(Direction::Right),
            "n" | "new" => {
                let update = engine.new_game();
                render(&update.state, &update.tiles);
                None
            }
            "c" | "continue" => {
                let state = engine.continue_game();
                println!("continuing past {}", engine_cfg.winning_tile);
                render(&state, &engine.tiles());
                None
            }
            "q" | "quit" => break,
            "" => None,
            _ => {
                print_help();
                None
            }
        };

        if let Some(dir) = direction {
            let outcome = engine.make_move(dir);
            if !outcome.moved {
                println!("nothing moves that way");
            } else {
                render(&outcome.state, &outcome.tiles);
            }
            if outcome.state.won && !outcome.state.keep_playing {
                println!("you win! 'c' to keep playing, 'n' for a new game");
            }
            if outcome.state.game_over {
                println!(
                    "game over after {} moves, score {}. 'n' for a new game, 'q' to quit",
                    outcome.state.move_count, outcome.state.score
                );
            }
        }
        prompt()?;
    }

    let last = engine.snapshot();
    info!(
        score = last.score,
        best = last.best_score,
        moves = last.move_count,
        seconds = last.elapsed.as_secs(),
        "session finished"
    );
    Ok(())
}

fn render(state: &GameSnapshot, tiles: &[Tile]) {
    println!();
    print!("{}", format_board(state.size, tiles));
    println!(
        "score {}  best {}  moves {}  highest {}",
        state.score, state.best_score, state.move_count, state.highest_tile
    );
}

fn print_help() {
    println!("moves: w/a/s/d (or up/left/down/right), n = new game, c = continue after a win, q = quit");
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}
