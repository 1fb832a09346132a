//! Search history domain models.

use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in the ledger.
pub const HISTORY_CAPACITY: usize = 20;

/// Category recorded for searches made through the analysis stream.
pub const DEFAULT_CATEGORY: &str = "competitor-research";

/// One past search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub query: String,
    #[serde(default)]
    pub description: String,
    /// Unix epoch milliseconds of the ledger insertion.
    pub timestamp: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub logo_url: String,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query: query.into(),
            description: String::new(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            category: DEFAULT_CATEGORY.to_string(),
            logo_url: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Capped, most-recent-first list of past searches, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from stored entries, restoring the invariants
    /// (first occurrence of an id wins, capacity enforced).
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        let mut ledger = Self::new();
        for entry in entries {
            if !ledger.contains(&entry.id) && ledger.entries.len() < HISTORY_CAPACITY {
                ledger.entries.push(entry);
            }
        }
        ledger
    }

    /// Inserts `entry` at the front. An existing entry with the same id is
    /// removed first; the oldest entry is evicted past capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.retain(|e| e.id != entry.id);
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Removes the entry with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<HistoryEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
