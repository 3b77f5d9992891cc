//! Command-line interface for luffarschack.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Luffarschack - tic-tac-toe against the computer, with lifetime stats
#[derive(Parser, Debug)]
#[command(name = "luffarschack")]
#[command(about = "Tic-tac-toe against the computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = "luffarschack.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Stats database (overrides config)
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Seed for the computer's random moves (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Computer thinking delay in milliseconds (overrides config)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Keep stats in memory only
        #[arg(long)]
        ephemeral: bool,
    },

    /// Print lifetime stats
    Stats {
        /// Stats database (overrides config)
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Zero the persisted lifetime stats
    ResetStats {
        /// Stats database (overrides config)
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_play_overrides() {
        let cli = Cli::try_parse_from([
            "luffarschack",
            "play",
            "--seed",
            "7",
            "--delay-ms",
            "0",
            "--ephemeral",
        ])
        .unwrap();
        match cli.command {
            Command::Play {
                seed,
                delay_ms,
                ephemeral,
                db_path,
            } => {
                assert_eq!(seed, Some(7));
                assert_eq!(delay_ms, Some(0));
                assert!(ephemeral);
                assert!(db_path.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli = Cli::try_parse_from(["luffarschack", "stats", "--config", "x.toml", "--json"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(cli.command, Command::Stats { json: true, .. }));
    }
}
