//! Database models for the stats table.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use luffarschack_engine::LifetimeStats;
use tracing::instrument;

use crate::db::{DbError, schema};

/// Stored counters row.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::lifetime_stats)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatsRecord {
    stats_key: String,
    player_wins: i32,
    computer_wins: i32,
    ties: i32,
    updated_at: NaiveDateTime,
}

impl StatsRecord {
    /// Converts the row into domain counters.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a stored counter is negative.
    #[instrument(skip(self), fields(stats_key = %self.stats_key))]
    pub fn to_stats(&self) -> Result<LifetimeStats, DbError> {
        Ok(LifetimeStats::new(
            counter_from_db("player_wins", self.player_wins)?,
            counter_from_db("computer_wins", self.computer_wins)?,
            counter_from_db("ties", self.ties)?,
        ))
    }
}

/// Row written on every save. Replaces any existing row with the same key.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::lifetime_stats)]
pub struct NewStatsRecord {
    stats_key: String,
    player_wins: i32,
    computer_wins: i32,
    ties: i32,
    updated_at: NaiveDateTime,
}

impl NewStatsRecord {
    /// Builds a row for `stats` under `stats_key`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a counter does not fit the column type.
    #[instrument(skip(stats_key))]
    pub fn from_stats(stats_key: &str, stats: &LifetimeStats) -> Result<Self, DbError> {
        Ok(Self::new(
            stats_key.to_string(),
            counter_to_db("player_wins", stats.player_wins)?,
            counter_to_db("computer_wins", stats.computer_wins)?,
            counter_to_db("ties", stats.ties)?,
            chrono::Utc::now().naive_utc(),
        ))
    }
}

fn counter_from_db(column: &str, value: i32) -> Result<u32, DbError> {
    u32::try_from(value).map_err(|_| DbError::new(format!("Negative {}: {}", column, value)))
}

fn counter_to_db(column: &str, value: u32) -> Result<i32, DbError> {
    i32::try_from(value).map_err(|_| DbError::new(format!("{} overflows column: {}", column, value)))
}
