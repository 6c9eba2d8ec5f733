//! Holds the one table a client ever acquires.

use crate::error::AidWeatherError;
use crate::table::observation_table::ObservationTable;
use log::{debug, info};
use std::sync::{Mutex, OnceLock, PoisonError};

/// Owns the canonical [`ObservationTable`] of a client and hands out copies.
///
/// The first [`get_or_fetch`](SeriesCache::get_or_fetch) runs the loader under
/// a mutex, so concurrent first callers still trigger a single acquisition.
/// Once filled, reads go straight to the stored table. A failed load stores
/// nothing and the next call tries again.
#[derive(Debug, Default)]
pub struct SeriesCache {
    table: OnceLock<ObservationTable>,
    gate: Mutex<()>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_populated(&self) -> bool {
        self.table.get().is_some()
    }

    /// Returns a copy of the cached table, running `load` first if the cache
    /// is still empty.
    pub fn get_or_fetch<F>(&self, load: F) -> Result<ObservationTable, AidWeatherError>
    where
        F: FnOnce() -> Result<ObservationTable, AidWeatherError>,
    {
        // Fast path: already filled
        if let Some(table) = self.table.get() {
            debug!("Serving cached table ({} rows)", table.height());
            return Ok(table.clone());
        }

        let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);

        // Someone else may have filled it while we waited for the gate
        if let Some(table) = self.table.get() {
            debug!("Table was filled by a concurrent caller");
            return Ok(table.clone());
        }

        let loaded = load()?;
        info!(
            "Cached table with {} rows and {} columns",
            loaded.height(),
            loaded.width()
        );
        Ok(self.table.get_or_init(|| loaded).clone())
    }
}
