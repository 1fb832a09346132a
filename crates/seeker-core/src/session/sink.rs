//! Observers of a running search session.

use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::event::StepTag;
use crate::result::SearchResult;

/// How the visible location of a session should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum LocationMode {
    /// Streaming: the location still carries the "new session" marker.
    InProgress,
    /// Completed: the marker is dropped.
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A non-blocking, user-visible message (a toast in the web front-end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Terminal state of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// `Done` received or the stream closed.
    Completed,
    /// The stall monitor declared completion.
    TimedOut,
    /// The transport failed.
    Errored { message: String },
    /// The caller cancelled the session.
    Aborted,
}

/// Summary handed out once per session at finalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub search_id: String,
    pub query: String,
    pub outcome: SessionOutcome,
    /// Whether the backend ever asserted an authoritative id.
    pub authoritative: bool,
    pub events_processed: usize,
    pub events_dropped: usize,
    pub result: SearchResult,
}

/// Receives view updates and side effects from a session.
///
/// All methods have no-op defaults. Implementations must not block: they
/// are called inline from the stream loop.
pub trait SessionSink: Send + Sync {
    /// A slice of the aggregate changed.
    fn on_update(&self, _tag: StepTag, _result: &SearchResult) {}

    /// Show a non-blocking notice.
    fn notify(&self, _notice: Notice) {}

    /// Rewrite the visible location to point at `search_id`.
    fn rewrite_location(&self, _search_id: &str, _mode: LocationMode) {}

    /// The session reached its terminal state.
    fn on_finished(&self, _report: &SessionReport) {}
}

/// A sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl SessionSink for NoopSink {}
