//! Stall detection policy.
//!
//! Some backends stream data and then leave the connection open without
//! sending `Done`. The monitor declares completion when nothing has arrived
//! for [`STALL_THRESHOLD`], but only after at least one competitor card was
//! seen. Both constants mirror the production backend behaviour and have no
//! documented contract behind them.

use std::time::Duration;

/// Silence after which a productive stream is considered finished.
pub const STALL_THRESHOLD: Duration = Duration::from_secs(15);

/// Tick period of the stall monitor.
pub const MONITOR_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StallPolicy {
    pub threshold: Duration,
    pub period: Duration,
}

impl Default for StallPolicy {
    fn default() -> Self {
        Self {
            threshold: STALL_THRESHOLD,
            period: MONITOR_PERIOD,
        }
    }
}

impl StallPolicy {
    /// Whether a stream silent for `idle` should be completed.
    pub fn should_complete(&self, idle: Duration, seen_competitor: bool) -> bool {
        seen_competitor && idle > self.threshold
    }
}
