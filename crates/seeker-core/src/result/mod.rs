//! The aggregate search result and its persistence contract.

pub mod cache;
pub mod model;

pub use cache::ResultCache;
pub use model::{
    Competitor, Figure, FunctionListEntry, HotKey, HotKeyBucket, HotKeysData, LogicStep,
    PriorityType, RequirementCard, ResultEnvelope, SearchResult, Trend,
};
