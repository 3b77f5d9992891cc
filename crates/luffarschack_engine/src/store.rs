//! Persistence boundary for lifetime stats.
//!
//! The engine only knows the [`StatsStore`] contract. The application
//! provides a durable implementation; [`MemoryStatsStore`] covers tests and
//! throwaway sessions.

use std::sync::{Arc, Mutex};

use derive_more::{Display, Error};
use tracing::{debug, instrument};

use crate::stats::LifetimeStats;

/// Load/save contract for the three lifetime counters.
pub trait StatsStore: Send {
    /// Loads the stored counters, or zeros when nothing was saved yet.
    fn load(&self) -> Result<LifetimeStats, StoreError>;

    /// Durably replaces the stored counters.
    fn save(&self, stats: &LifetimeStats) -> Result<(), StoreError>;
}

impl<S: StatsStore + Sync + ?Sized> StatsStore for Arc<S> {
    fn load(&self) -> Result<LifetimeStats, StoreError> {
        (**self).load()
    }

    fn save(&self, stats: &LifetimeStats) -> Result<(), StoreError> {
        (**self).save(stats)
    }
}

impl<S: StatsStore + ?Sized> StatsStore for Box<S> {
    fn load(&self) -> Result<LifetimeStats, StoreError> {
        (**self).load()
    }

    fn save(&self, stats: &LifetimeStats) -> Result<(), StoreError> {
        (**self).save(stats)
    }
}

/// Persistence failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// In-memory store. Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatsStore {
    inner: Arc<Mutex<Option<LifetimeStats>>>,
}

impl MemoryStatsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `stats`.
    pub fn with_stats(stats: LifetimeStats) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(stats))),
        }
    }
}

impl StatsStore for MemoryStatsStore {
    #[instrument(skip(self))]
    fn load(&self) -> Result<LifetimeStats, StoreError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| StoreError::new(format!("Lock poisoned: {}", e)))?;
        Ok(guard.unwrap_or_default())
    }

    #[instrument(skip(self))]
    fn save(&self, stats: &LifetimeStats) -> Result<(), StoreError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StoreError::new(format!("Lock poisoned: {}", e)))?;
        *guard = Some(*stats);
        debug!(?stats, "Stats saved in memory");
        Ok(())
    }
}
