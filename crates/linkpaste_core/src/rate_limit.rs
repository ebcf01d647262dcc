//! Per-client sliding-window limiter for paste creation.
//!
//! State is process-local and resets on restart. It is advisory protection
//! against accidental floods, not a security boundary.

use crate::clock::{Clock, SystemClock};
use crate::constants::DEFAULT_RATE_LIMIT_SWEEP_THRESHOLD;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Gate consulted before accepting a request from `client_key`.
///
/// Implementations must be safe to share across concurrent requests.
pub trait RateLimiter: Send + Sync {
    /// Return `true` and record the attempt when the client is under its
    /// limit, `false` otherwise. Rejected attempts are not recorded.
    fn allow(&self, client_key: &str) -> bool;
}

/// Limiter that accepts everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLimiter;

impl RateLimiter for DisabledLimiter {
    fn allow(&self, _client_key: &str) -> bool {
        true
    }
}

#[derive(Default)]
struct LimiterState {
    windows: HashMap<String, VecDeque<DateTime<Utc>>>,
    last_sweep: Option<DateTime<Utc>>,
}

impl LimiterState {
    fn sweep(&mut self, now: DateTime<Utc>, cutoff: DateTime<Utc>) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, window| window.back().is_some_and(|newest| *newest > cutoff));
        self.last_sweep = Some(now);
        before - self.windows.len()
    }
}

/// Sliding window of accepted request timestamps per client key.
///
/// Once the map reaches the sweep threshold, a new client triggers a sweep
/// of idle keys at most once per window.
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    sweep_threshold: usize,
    clock: Arc<dyn Clock>,
    state: Mutex<LimiterState>,
}

impl SlidingWindowLimiter {
    /// Build a limiter on the system clock.
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self::with_clock(max_requests, window, Arc::new(SystemClock))
    }

    /// Build a limiter reading time from `clock`.
    pub fn with_clock(max_requests: usize, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_requests,
            window,
            sweep_threshold: DEFAULT_RATE_LIMIT_SWEEP_THRESHOLD,
            clock,
            state: Mutex::new(LimiterState::default()),
        }
    }

    /// Override how many tracked clients trigger an idle sweep.
    pub fn with_sweep_threshold(mut self, threshold: usize) -> Self {
        self.sweep_threshold = threshold;
        self
    }

    fn state(&self) -> MutexGuard<'_, LimiterState> {
        // Limiter state is advisory; a panic elsewhere should not wedge creation.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn prune(window: &mut VecDeque<DateTime<Utc>>, cutoff: DateTime<Utc>) {
        while window.front().is_some_and(|oldest| *oldest <= cutoff) {
            window.pop_front();
        }
    }

    /// Drop clients whose newest request has left the window.
    ///
    /// # Returns
    /// Number of client entries removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        self.state().sweep(now, now - self.window)
    }

    /// Number of client keys currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.state().windows.len()
    }
}

impl RateLimiter for SlidingWindowLimiter {
    fn allow(&self, client_key: &str) -> bool {
        let now = self.clock.now();
        let cutoff = now - self.window;
        let mut state = self.state();

        let sweep_due = state
            .last_sweep
            .map_or(true, |last| now - last >= self.window);
        if sweep_due
            && state.windows.len() >= self.sweep_threshold
            && !state.windows.contains_key(client_key)
        {
            let removed = state.sweep(now, cutoff);
            tracing::debug!(
                removed,
                remaining = state.windows.len(),
                "Swept idle rate-limit entries"
            );
        }

        let windows = &mut state.windows;
        let window = windows.entry(client_key.to_string()).or_default();
        Self::prune(window, cutoff);
        if window.len() >= self.max_requests {
            tracing::info!(client = client_key, "Paste creation rate limited");
            if window.is_empty() {
                windows.remove(client_key);
            }
            return false;
        }
        window.push_back(now);
        true
    }
}
