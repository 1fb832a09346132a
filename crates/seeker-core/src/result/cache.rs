//! Result persistence cache trait.

use super::model::{ResultEnvelope, SearchResult};
use crate::error::Result;

/// Durable key-value store of result envelopes, keyed by search id.
///
/// Reads and writes are synchronous: the store plays the role of
/// browser-local storage and must be usable from a drop path.
///
/// # Implementation Notes
///
/// - `save` is called after every processed stream event; last write wins.
/// - `load` must return `Ok(None)` for entries that are absent *or* fail the
///   structural check (see [`ResultEnvelope::has_valid_shape`]). Callers
///   treat that as "no cache" and fetch again.
/// - There is no expiry.
pub trait ResultCache: Send + Sync {
    /// Writes a timestamped envelope for `search_id`.
    fn save(&self, search_id: &str, query: &str, result: &SearchResult) -> Result<()>;

    /// Loads the envelope stored for `search_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ResultEnvelope))`: A structurally valid envelope exists
    /// - `Ok(None)`: Nothing usable is stored
    /// - `Err(_)`: The storage itself failed
    fn load(&self, search_id: &str) -> Result<Option<ResultEnvelope>>;

    /// Removes the envelope for `search_id` (no-op if absent).
    fn remove(&self, search_id: &str) -> Result<()>;

    /// Lists the ids of all stored envelopes.
    fn list_ids(&self) -> Result<Vec<String>>;
}
