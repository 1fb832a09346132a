//! Search history ledger.

pub mod model;
pub mod repository;

pub use model::{DEFAULT_CATEGORY, HISTORY_CAPACITY, HistoryEntry, HistoryLedger};
pub use repository::HistoryRepository;
