//! Luffarschack - CLI entry point.

#![warn(missing_docs)]

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use luffarschack::cli::{Cli, Command};
use luffarschack::{AppConfig, GameSession, SqliteStatsStore, runner, tui};
use luffarschack_engine::{MemoryStatsStore, Opponent, StatsStore};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,luffarschack=debug,luffarschack_engine=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Command::Play {
            db_path,
            seed,
            delay_ms,
            ephemeral,
        } => {
            let mut config = config;
            if let Some(path) = db_path {
                config = config.with_db_path(path);
            }
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(ms) = delay_ms {
                config = config.with_opponent_delay_ms(ms);
            }
            run_play(config, ephemeral).await
        }
        Command::Stats { db_path, json } => {
            init_stderr_tracing();
            let store = open_store(&db_path.unwrap_or_else(|| config.db_path().clone()))?;
            print_stats(&store, json)
        }
        Command::ResetStats { db_path } => {
            init_stderr_tracing();
            let store = open_store(&db_path.unwrap_or_else(|| config.db_path().clone()))?;
            store.clear().context("Failed to reset stats")?;
            println!("Lifetime stats reset.");
            Ok(())
        }
    }
}

/// Plays in the terminal until the user quits.
#[instrument(skip(config), fields(db_path = %config.db_path().display()))]
async fn run_play(config: AppConfig, ephemeral: bool) -> Result<()> {
    init_file_tracing(config.log_file())?;
    info!(?config, ephemeral, "Starting Luffarschack");

    let store: Box<dyn StatsStore> = if ephemeral {
        Box::new(MemoryStatsStore::new())
    } else {
        Box::new(open_store(config.db_path())?)
    };

    let opponent = match config.seed() {
        Some(seed) => Opponent::seeded(*seed),
        None => Opponent::from_entropy(),
    };

    let session = GameSession::open(store, opponent).context("Failed to load lifetime stats")?;
    let (handle, task) = runner::spawn(session, config.opponent_delay());

    let res = tui::run_tui(&handle).await;
    runner::shutdown(handle, task).await?;
    res
}

fn open_store(path: &Path) -> Result<SqliteStatsStore> {
    SqliteStatsStore::open(&path.to_string_lossy())
        .with_context(|| format!("Failed to open stats database {}", path.display()))
}

fn print_stats(store: &SqliteStatsStore, json: bool) -> Result<()> {
    let stats = store.load().context("Failed to load lifetime stats")?;
    if json {
        let value = serde_json::json!({
            "player_wins": stats.player_wins,
            "computer_wins": stats.computer_wins,
            "ties": stats.ties,
            "win_loss_ratio": stats.win_loss_ratio(),
            "tie_percentage": stats.tie_percentage(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", stats);
    }
    Ok(())
}

/// Logs to a file so the terminal UI stays clean.
fn init_file_tracing(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn init_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
