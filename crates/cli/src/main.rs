//! Command-line simulator: loads a board, seats players and plays turns.
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use board_content::ContentFactory;
use board_core::{Component, EngineError, EntityId, Game, GameError};
use clap::Parser;
use config::EnvConfig;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Simulate a trading board game from data files
#[derive(Parser)]
#[command(name = "board-cli")]
#[command(about = "Plays a board game simulation from JSON/TOML content", long_about = None)]
#[command(version)]
struct Cli {
    /// Content directory holding `config.toml` and `boards/`
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Board name, loaded from `boards/<NAME>.json`
    #[arg(short, long, default_value = "classic")]
    board: String,

    /// Player names, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "alice,bob")]
    players: Vec<String>,

    /// Number of turns to play
    #[arg(short, long, default_value_t = 20)]
    turns: u32,

    /// Overrides the configured RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Accept every purchase offer automatically
    #[arg(long)]
    auto_purchase: bool,

    /// Print every dispatched event instead of the message log
    #[arg(long)]
    events: bool,
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let env = EnvConfig::from_env();
    let cli = Cli::parse();

    setup_logging(&env)?;

    let data_dir = cli
        .data_dir
        .clone()
        .or(env.data_dir)
        .unwrap_or_else(|| PathBuf::from("data"));
    let factory = ContentFactory::new(data_dir);

    let mut config = factory.load_config().context("loading config.toml")?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config.auto_purchase |= cli.auto_purchase;

    let mut game = factory
        .build_game(config, &cli.board)
        .with_context(|| format!("loading board {}", cli.board))?;

    let players = seat_players(&mut game, &cli.players)?;
    game.start().context("starting game")?;

    for _ in 0..cli.turns {
        play_turn(&mut game)?;
    }

    report(&game, &players, cli.events);
    Ok(())
}

/// Setup logging to stderr, plus a log file when `LOG_DIR` is set.
fn setup_logging(env: &EnvConfig) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let file_layer = match &env.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::never(dir, "board-cli.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            // Leak the guard to keep file writer alive
            std::mem::forget(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking_file)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = &env.log_dir {
        info!("Log file: {}/board-cli.log", dir.display());
    }
    Ok(())
}

fn seat_players(game: &mut Game, names: &[String]) -> Result<Vec<EntityId>> {
    let names: Vec<&str> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        bail!("at least one player name is required");
    }

    names
        .into_iter()
        .map(|name| {
            game.add_player(name)
                .with_context(|| format!("seating player {name}"))
        })
        .collect()
}

/// Rolls for the active player, takes any affordable offer, then passes the
/// turn on.
fn play_turn(game: &mut Game) -> Result<()> {
    if let Some(dice) = classify(game.roll(), "rolling dice")? {
        info!(target: "cli", turn = game.turn(), ?dice, "turn played");
    }

    if let Some(offer) = game.pending_offer() {
        if game.balance(offer.player) >= offer.price {
            let bought = classify(game.buy(offer.tile, offer.player), "accepting purchase offer")?;
            if bought == Some(false) {
                warn!(target: "cli", player = %offer.player, tile = %offer.tile, "purchase declined");
            }
        }
    }

    game.next_turn().context("ending turn")?;
    Ok(())
}

/// Logs an engine error by severity. Recoverable errors skip the step,
/// anything else stops the simulation.
fn classify<T>(result: Result<T, EngineError>, step: &'static str) -> Result<Option<T>> {
    let err = match result {
        Ok(value) => return Ok(Some(value)),
        Err(err) => err,
    };

    let severity = err.severity();
    if severity.is_recoverable() {
        warn!(target: "cli", severity = severity.as_str(), code = err.error_code(), %err, "{step} skipped");
        return Ok(None);
    }
    if severity.is_internal() {
        error!(target: "cli", severity = severity.as_str(), code = err.error_code(), %err, "{step} failed");
    }
    Err(anyhow::Error::new(err).context(step))
}

fn report(game: &Game, players: &[EntityId], events: bool) {
    if events {
        for event in game.journal() {
            println!("{event}");
        }
    } else {
        for message in game.messages() {
            println!("{message}");
        }
    }

    println!();
    println!("after {} turns:", game.turn());
    for &player in players {
        let Ok(view) = game.player(player) else {
            continue;
        };
        let owned = game
            .board()
            .tiles
            .iter()
            .filter(|&&tile| game.store().get_entity(Component::Owner, tile) == Some(player))
            .count();
        println!(
            "  {:<12} balance {:>6}  position {:>3}  tiles owned {:>2}  debt {}",
            view.name,
            view.balance,
            view.position,
            owned,
            view.total_debt()
        );
    }
}
