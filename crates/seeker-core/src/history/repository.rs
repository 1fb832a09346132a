//! History ledger repository trait.

use super::model::HistoryEntry;
use crate::error::Result;

/// Durable storage of the search history ledger.
///
/// Implementations keep the [`HistoryLedger`](super::HistoryLedger)
/// invariants: most-recent-first, unique ids, capped at
/// [`HISTORY_CAPACITY`](super::HISTORY_CAPACITY).
pub trait HistoryRepository: Send + Sync {
    /// Returns all entries, most recent first.
    fn list(&self) -> Result<Vec<HistoryEntry>>;

    /// Inserts `entry` at the front, promoting an existing entry with the
    /// same id instead of duplicating it.
    fn append(&self, entry: HistoryEntry) -> Result<()>;

    /// Removes the entry with `id` (no-op if absent).
    fn remove(&self, id: &str) -> Result<()>;

    /// Empties the ledger.
    fn clear(&self) -> Result<()>;
}
