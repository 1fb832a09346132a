//! Session-scoped state of one analysis stream.
//!
//! `SearchSession` owns the aggregate and is the single write path to
//! storage: [`SearchSession::commit`] snapshots after every applied event and
//! [`SearchSession::finalize`] runs the terminal routine exactly once,
//! whichever terminal trigger reaches it first. The guard is a plain `bool`
//! because the session is driven from one task at a time (`&mut self`).

use std::sync::Arc;

use serde_json::Value;

use super::identity::SearchIdentity;
use super::sink::{Notice, SessionOutcome, SessionReport, SessionSink};
use crate::event::{NormalizedLine, StreamEvent, normalize_line};
use crate::history::{HistoryEntry, HistoryRepository};
use crate::result::{ResultCache, SearchResult};
use crate::strategy::{StrategyContext, StrategyOutcome, StrategyRegistry};

/// What happened to one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Not an event (blank, comment, unknown step) or the session is over.
    Skipped,
    /// Folded into the aggregate and snapshotted.
    Applied,
    /// Malformed; logged and dropped.
    Dropped,
    /// The terminal `Done` event.
    Done,
}

pub struct SearchSession {
    query: String,
    identity: SearchIdentity,
    result: SearchResult,
    registry: StrategyRegistry,
    cache: Arc<dyn ResultCache>,
    history: Arc<dyn HistoryRepository>,
    sink: Arc<dyn SessionSink>,
    seen_competitor: bool,
    finalized: bool,
    events_processed: usize,
    events_dropped: usize,
}

impl SearchSession {
    pub fn new(
        query: impl Into<String>,
        identity: SearchIdentity,
        cache: Arc<dyn ResultCache>,
        history: Arc<dyn HistoryRepository>,
        sink: Arc<dyn SessionSink>,
    ) -> Self {
        Self {
            query: query.into(),
            identity,
            result: SearchResult::new(),
            registry: StrategyRegistry::new(),
            cache,
            history,
            sink,
            seen_competitor: false,
            finalized: false,
            events_processed: 0,
            events_dropped: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn identity(&self) -> &SearchIdentity {
        &self.identity
    }

    pub fn search_id(&self) -> &str {
        self.identity.current()
    }

    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    /// Whether at least one competitor card has been received.
    pub fn seen_competitor(&self) -> bool {
        self.seen_competitor
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Normalizes, decodes and applies one raw line.
    pub fn process_line(&mut self, line: &str) -> LineOutcome {
        if self.finalized {
            return LineOutcome::Skipped;
        }
        match normalize_line(line) {
            NormalizedLine::Passthrough(_) => LineOutcome::Skipped,
            NormalizedLine::Unparseable(raw) => {
                tracing::warn!(
                    search_id = self.search_id(),
                    line = %raw,
                    "Dropping unparseable stream line"
                );
                self.events_dropped += 1;
                LineOutcome::Dropped
            }
            NormalizedLine::Data { value, .. } => self.process_value(&value),
        }
    }

    /// Decodes and applies one event object.
    pub fn process_value(&mut self, value: &Value) -> LineOutcome {
        if self.finalized {
            return LineOutcome::Skipped;
        }
        let event = match StreamEvent::from_value(value) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(search_id = self.search_id(), error = %e, "Dropping malformed event");
                self.events_dropped += 1;
                return LineOutcome::Dropped;
            }
        };
        let is_competitor = matches!(event, StreamEvent::Competitor { .. });
        let step = event.tag();
        let outcome = {
            let mut ctx = StrategyContext {
                result: &mut self.result,
                identity: &mut self.identity,
                sink: self.sink.as_ref(),
            };
            self.registry.process(event, &mut ctx)
        };
        match outcome {
            StrategyOutcome::Dropped => {
                self.events_dropped += 1;
                return LineOutcome::Dropped;
            }
            StrategyOutcome::Ignored => return LineOutcome::Skipped,
            StrategyOutcome::Applied | StrategyOutcome::Done => {}
        }
        if is_competitor {
            self.seen_competitor = true;
        }
        self.events_processed += 1;
        tracing::debug!(search_id = self.search_id(), step = ?step, "Applied stream event");

        self.commit();
        if outcome == StrategyOutcome::Done {
            LineOutcome::Done
        } else {
            LineOutcome::Applied
        }
    }

    /// Snapshots the aggregate under the current search id.
    ///
    /// Storage failures are logged, not propagated: a failed snapshot must
    /// not end the stream.
    pub fn commit(&self) {
        if let Err(e) = self
            .cache
            .save(self.identity.current(), &self.query, &self.result)
        {
            tracing::warn!(search_id = self.search_id(), error = %e, "Failed to snapshot search result");
        }
    }

    /// Runs the terminal routine: persist, record history, report.
    ///
    /// An `Errored` outcome is also surfaced to the sink as an error notice.
    ///
    /// Only the first call does anything; later calls return `None`.
    pub fn finalize(&mut self, outcome: SessionOutcome) -> Option<SessionReport> {
        if self.finalized {
            tracing::debug!(
                search_id = self.search_id(),
                outcome = ?outcome,
                "Session already finalized"
            );
            return None;
        }
        self.finalized = true;

        self.commit();
        let entry = HistoryEntry::new(self.identity.current(), &self.query)
            .with_description(self.result.headline());
        if let Err(e) = self.history.append(entry) {
            tracing::warn!(search_id = self.search_id(), error = %e, "Failed to record search history");
        }

        let report = SessionReport {
            search_id: self.identity.current().to_string(),
            query: self.query.clone(),
            outcome,
            authoritative: self.identity.is_authoritative(),
            events_processed: self.events_processed,
            events_dropped: self.events_dropped,
            result: self.result.clone(),
        };
        tracing::info!(
            search_id = %report.search_id,
            outcome = ?report.outcome,
            events = report.events_processed,
            dropped = report.events_dropped,
            "Search session finalized"
        );
        if let SessionOutcome::Errored { message } = &report.outcome {
            self.sink
                .notify(Notice::error(format!("Search failed: {message}")));
        }
        self.sink.on_finished(&report);
        Some(report)
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if !self.finalized {
            self.finalize(SessionOutcome::Aborted);
        }
    }
}
