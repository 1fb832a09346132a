//! Application layer for Seeker.
//!
//! Use cases that coordinate the domain, storage and HTTP layers.

pub mod history_usecase;
pub mod search_usecase;

pub use history_usecase::HistoryUseCase;
pub use search_usecase::{SearchOutcome, SearchRequest, SearchUseCase};
