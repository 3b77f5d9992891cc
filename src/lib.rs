//! Luffarschack - tic-tac-toe against the computer with lifetime stats.
//!
//! The rules, the opponent and the session reducer live in
//! [`luffarschack_engine`]. This crate adds everything with side effects:
//!
//! - **Session**: [`GameSession`] applies the reducer and writes stats
//! - **Runner**: async actor that owns the session and the thinking delay
//! - **Database**: SQLite stats store via diesel
//! - **TUI**: ratatui front end
//!
//! # Example
//!
//! ```
//! use luffarschack::GameSession;
//! use luffarschack_engine::{MemoryStatsStore, Opponent};
//!
//! let mut session = GameSession::open(MemoryStatsStore::new(), Opponent::seeded(1)).unwrap();
//! session.handle_player_move(4).unwrap();
//! assert!(*session.snapshot().thinking());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
mod config;
mod db;
pub mod runner;
mod session;
pub mod tui;

pub use config::{AppConfig, ConfigError};
pub use db::{DbError, NewStatsRecord, STATS_KEY, SqliteStatsStore, StatsRecord, StatsRepository};
pub use runner::SessionHandle;
pub use session::{GameSession, SessionError, Snapshot};
