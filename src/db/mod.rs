//! SQLite persistence for lifetime statistics.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only
mod store;

pub use error::DbError;
pub use models::{NewStatsRecord, StatsRecord};
pub use repository::StatsRepository;
pub use store::{STATS_KEY, SqliteStatsStore};
