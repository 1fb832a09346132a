//! Search session: identity, stall policy, observers and the session state.

pub mod identity;
pub mod policy;
pub mod search_session;
pub mod sink;

pub use identity::SearchIdentity;
pub use policy::{MONITOR_PERIOD, STALL_THRESHOLD, StallPolicy};
pub use search_session::{LineOutcome, SearchSession};
pub use sink::{
    LocationMode, NoopSink, Notice, NoticeLevel, SessionOutcome, SessionReport, SessionSink,
};
