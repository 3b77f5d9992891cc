//! [`StatsStore`] backed by [`StatsRepository`].

use luffarschack_engine::{LifetimeStats, StatsStore, StoreError};
use tracing::instrument;

use crate::db::{DbError, StatsRepository};

/// Key the counters are stored under.
pub const STATS_KEY: &str = "lifetime_stats";

/// Durable stats store on a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteStatsStore {
    repository: StatsRepository,
}

impl SqliteStatsStore {
    /// Opens (and migrates) the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened.
    #[instrument]
    pub fn open(db_path: &str) -> Result<Self, DbError> {
        Ok(Self {
            repository: StatsRepository::open(db_path.to_string())?,
        })
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &StatsRepository {
        &self.repository
    }

    /// Removes the stored counters; the next load returns zeros.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    pub fn clear(&self) -> Result<(), DbError> {
        self.repository.clear(STATS_KEY)
    }
}

impl StatsStore for SqliteStatsStore {
    fn load(&self) -> Result<LifetimeStats, StoreError> {
        Ok(self.repository.load(STATS_KEY)?)
    }

    fn save(&self, stats: &LifetimeStats) -> Result<(), StoreError> {
        Ok(self.repository.save(STATS_KEY, stats)?)
    }
}
