//! Sliding-window request throttling.
//!
//! One [`RateWindow`] tracks the recent hit timestamps for a single
//! identifier (an IP, a user id) under a single [`ThrottlePolicy`]. The
//! arithmetic is pure: every operation takes `now` as an argument, so the
//! whole module is testable with fixed timestamps. Storage, locking, and
//! the periodic sweep that discards idle windows live in the API crate.

use std::collections::VecDeque;

use chrono::Duration;

use crate::types::Timestamp;

/// Limits for one class of traffic.
#[derive(Debug, Clone, Copy)]
pub struct ThrottlePolicy {
    /// Short label used in logs and response headers.
    pub name: &'static str,
    /// Maximum hits per identifier within one interval.
    pub max_requests: u32,
    /// Width of the sliding window.
    pub interval: Duration,
}

impl ThrottlePolicy {
    pub fn new(name: &'static str, max_requests: u32, interval: Duration) -> Self {
        Self {
            name,
            max_requests,
            interval,
        }
    }
}

/// Outcome of one admission check, in the units the HTTP layer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleDecision {
    pub allowed: bool,
    /// The policy's `max_requests`, echoed for the `x-ratelimit-limit` header.
    pub limit: u32,
    /// Hits left in the current window after this one.
    pub remaining: u32,
    /// When the oldest counted hit ages out of the window.
    pub reset: Timestamp,
}

impl ThrottleDecision {
    /// Whole seconds until `reset`, rounded up so a client that waits this
    /// long is guaranteed to land on or after the reset instant.
    pub fn retry_after_secs(&self, now: Timestamp) -> i64 {
        let millis = (self.reset - now).num_milliseconds().max(0);
        (millis + 999) / 1000
    }
}

/// Hit history for one identifier, oldest first.
#[derive(Debug, Default)]
pub struct RateWindow {
    hits: VecDeque<Timestamp>,
}

impl RateWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop hits that have aged out of the window. A hit at `t` stops
    /// counting once `t + interval <= now`, so a request arriving exactly
    /// at the reset instant is admitted.
    fn prune(&mut self, policy: &ThrottlePolicy, now: Timestamp) {
        while let Some(oldest) = self.hits.front() {
            if *oldest + policy.interval <= now {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }

    /// Count a request against the window and decide whether it may proceed.
    ///
    /// Admitted requests are recorded; rejected ones are not, so hammering
    /// a depleted window does not push the reset further into the future.
    pub fn admit(&mut self, policy: &ThrottlePolicy, now: Timestamp) -> ThrottleDecision {
        self.prune(policy, now);

        if (self.hits.len() as u32) < policy.max_requests {
            self.hits.push_back(now);
            // Non-empty after the push, so front() always exists.
            let oldest = *self.hits.front().unwrap_or(&now);
            ThrottleDecision {
                allowed: true,
                limit: policy.max_requests,
                remaining: policy.max_requests.saturating_sub(self.hits.len() as u32),
                reset: oldest + policy.interval,
            }
        } else {
            let oldest = *self.hits.front().unwrap_or(&now);
            ThrottleDecision {
                allowed: false,
                limit: policy.max_requests,
                remaining: 0,
                reset: oldest + policy.interval,
            }
        }
    }

    /// Whether every recorded hit has aged out. Idle windows hold no state
    /// worth keeping and are reclaimed by the periodic sweep.
    pub fn is_idle(&self, policy: &ThrottlePolicy, now: Timestamp) -> bool {
        match self.hits.back() {
            Some(newest) => *newest + policy.interval <= now,
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
