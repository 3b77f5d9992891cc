//! Database repository for lifetime stats.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use luffarschack_engine::LifetimeStats;
use tracing::{debug, info, instrument};

use crate::db::{DbError, NewStatsRecord, StatsRecord, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for the stats table.
///
/// A connection is opened per operation; the repository itself only holds
/// the path. `":memory:"` is therefore not useful here, since each
/// connection would see a fresh database.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    db_path: String,
}

impl StatsRepository {
    /// Opens the database at `db_path`, creating it and applying pending
    /// migrations as needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening StatsRepository");
        let repository = Self { db_path };
        let mut conn = repository.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        debug!(applied = applied.len(), "Migrations up to date");
        Ok(repository)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Loads the row stored under `stats_key`. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find(&self, stats_key: &str) -> Result<Option<StatsRecord>, DbError> {
        let mut conn = self.connection()?;

        let record = schema::lifetime_stats::table
            .find(stats_key)
            .select(StatsRecord::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = record.is_some(), "Stats lookup finished");
        Ok(record)
    }

    /// Loads counters under `stats_key`, or zeros when no row exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or the row is corrupt.
    #[instrument(skip(self))]
    pub fn load(&self, stats_key: &str) -> Result<LifetimeStats, DbError> {
        match self.find(stats_key)? {
            Some(record) => {
                let stats = record.to_stats()?;
                info!(?stats, updated_at = %record.updated_at(), "Stats loaded");
                Ok(stats)
            }
            None => {
                info!("No stored stats, starting from zero");
                Ok(LifetimeStats::default())
            }
        }
    }

    /// Writes counters under `stats_key`, replacing any previous row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn save(&self, stats_key: &str, stats: &LifetimeStats) -> Result<(), DbError> {
        let record = NewStatsRecord::from_stats(stats_key, stats)?;
        let mut conn = self.connection()?;

        let rows = diesel::replace_into(schema::lifetime_stats::table)
            .values(&record)
            .execute(&mut conn)?;

        info!(rows, ?stats, "Stats saved");
        Ok(())
    }

    /// Deletes the row under `stats_key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn clear(&self, stats_key: &str) -> Result<(), DbError> {
        let mut conn = self.connection()?;

        let rows = diesel::delete(schema::lifetime_stats::table.find(stats_key))
            .execute(&mut conn)?;

        info!(rows, "Stats cleared");
        Ok(())
    }
}
