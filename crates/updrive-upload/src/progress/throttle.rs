//! Progress throttling.
//!
//! Rate-limits progress notifications so a fast stream of small chunks does
//! not flood the push channel.

use std::time::Duration;

use tokio::time::Instant;

/// Whether enough time has passed since `last_allowed` to emit again.
///
/// Returns true iff `now - last_allowed > interval`. If `now` precedes
/// `last_allowed` the elapsed time saturates to zero.
#[must_use]
pub fn may_emit(last_allowed: Instant, now: Instant, interval: Duration) -> bool {
    now.saturating_duration_since(last_allowed) > interval
}

/// Timestamp of the last notification allowed for one upload session.
///
/// Initialized at session start rather than at some epoch, so the decision
/// for the very first chunk depends only on how long the first chunk took
/// to arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleState {
    last_allowed: Instant,
}

impl ThrottleState {
    /// Create a throttle anchored at `started_at`.
    #[must_use]
    pub const fn new(started_at: Instant) -> Self {
        Self {
            last_allowed: started_at,
        }
    }

    /// Check the policy at `now`, recording `now` when emission is allowed.
    pub fn check(&mut self, now: Instant, interval: Duration) -> bool {
        if may_emit(self.last_allowed, now, interval) {
            self.last_allowed = now;
            true
        } else {
            false
        }
    }

    /// When the last notification was allowed (or the session start).
    #[must_use]
    pub const fn last_allowed(&self) -> Instant {
        self.last_allowed
    }
}
