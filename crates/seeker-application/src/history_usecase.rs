//! History use cases: list, forget one search, clear everything.

use std::sync::Arc;

use anyhow::{Context, Result};
use seeker_core::history::{HistoryEntry, HistoryRepository};
use seeker_core::result::ResultCache;

pub struct HistoryUseCase {
    history: Arc<dyn HistoryRepository>,
    cache: Arc<dyn ResultCache>,
}

impl HistoryUseCase {
    pub fn new(history: Arc<dyn HistoryRepository>, cache: Arc<dyn ResultCache>) -> Self {
        Self { history, cache }
    }

    /// Most recent first.
    pub fn list(&self) -> Result<Vec<HistoryEntry>> {
        self.history.list().context("Failed to read search history")
    }

    /// Drops `id` from the ledger and, with `purge`, its cached result.
    pub fn forget(&self, id: &str, purge: bool) -> Result<()> {
        self.history
            .remove(id)
            .with_context(|| format!("Failed to remove '{}' from history", id))?;
        if purge {
            self.cache
                .remove(id)
                .with_context(|| format!("Failed to remove cached result '{}'", id))?;
        }
        Ok(())
    }

    /// Empties the ledger. With `purge`, every cached result goes too.
    ///
    /// Returns the number of cached results removed.
    pub fn clear(&self, purge: bool) -> Result<usize> {
        self.history.clear().context("Failed to clear search history")?;
        if !purge {
            return Ok(0);
        }

        let ids = self.cache.list_ids().context("Failed to list cached results")?;
        for id in &ids {
            self.cache
                .remove(id)
                .with_context(|| format!("Failed to remove cached result '{}'", id))?;
        }
        tracing::info!(removed = ids.len(), "Purged cached results");
        Ok(ids.len())
    }
}
