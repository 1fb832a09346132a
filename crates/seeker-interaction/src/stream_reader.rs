//! Stream reader and stall monitor.
//!
//! [`StreamReader::drive`] pumps a chunked body into a [`SearchSession`]
//! until one terminal trigger fires: `Done`, server close, read failure,
//! cancellation, or the stall policy. The read loop and the monitor tick are
//! arms of one `select!`, so they never run concurrently and the session's
//! `finalized` flag is enough to make finalization happen once.

use std::pin::pin;

use futures::{Stream, StreamExt};
use seeker_core::session::{
    LineOutcome, SearchSession, SessionOutcome, SessionReport, StallPolicy,
};
use seeker_core::{Result, SeekerError};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use crate::line_buffer::LineBuffer;

#[derive(Debug, Clone, Default)]
pub struct StreamReader {
    policy: StallPolicy,
}

impl StreamReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: StallPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &StallPolicy {
        &self.policy
    }

    /// Reads `body` into `session` and finalizes it.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(report))`: the session reached a terminal state here
    /// - `Ok(None)`: the session had already been finalized
    /// - `Err(Transport)`: reading the body failed; the session was
    ///   finalized as `Errored` before returning
    pub async fn drive<S, B, E>(
        &self,
        session: &mut SearchSession,
        body: S,
        cancel: &CancellationToken,
    ) -> Result<Option<SessionReport>>
    where
        S: Stream<Item = std::result::Result<B, E>>,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        let mut body = pin!(body);
        let mut lines = LineBuffer::new();

        let started = Instant::now();
        let mut ticker = interval_at(started + self.policy.period, self.policy.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_chunk_at = started;
        let mut transport_error = None;

        tracing::debug!(search_id = session.search_id(), "Reading analysis stream");

        let outcome = loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::info!(search_id = session.search_id(), "Search cancelled");
                    break SessionOutcome::Aborted;
                }

                chunk = body.next() => match chunk {
                    Some(Ok(bytes)) => {
                        last_chunk_at = Instant::now();
                        if feed(session, lines.push(bytes.as_ref())) {
                            break SessionOutcome::Completed;
                        }
                    }
                    Some(Err(e)) => {
                        let message = e.to_string();
                        tracing::warn!(
                            search_id = session.search_id(),
                            error = %message,
                            "Analysis stream failed"
                        );
                        transport_error = Some(SeekerError::transport(None, message.clone()));
                        break SessionOutcome::Errored { message };
                    }
                    None => {
                        if let Some(rest) = lines.finish() {
                            feed(session, vec![rest]);
                        }
                        tracing::debug!(search_id = session.search_id(), "Server closed the stream");
                        break SessionOutcome::Completed;
                    }
                },

                _ = ticker.tick() => {
                    let idle = last_chunk_at.elapsed();
                    if self.policy.should_complete(idle, session.seen_competitor()) {
                        tracing::info!(
                            search_id = session.search_id(),
                            idle_secs = idle.as_secs(),
                            "Stream went quiet after competitor data; completing"
                        );
                        break SessionOutcome::TimedOut;
                    }
                }
            }
        };

        let report = session.finalize(outcome);
        match transport_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }
}

/// Feeds complete lines to the session. Returns `true` on `Done`; lines after
/// it are discarded.
fn feed(session: &mut SearchSession, lines: Vec<String>) -> bool {
    lines
        .iter()
        .any(|line| session.process_line(line) == LineOutcome::Done)
}
