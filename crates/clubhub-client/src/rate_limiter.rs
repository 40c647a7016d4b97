//! Minimum-interval rate limiter
//!
//! Remembers when the last request was made and answers whether the next one
//! may go out yet. Callers decide when a request counts: `record_request` is
//! not tied to any particular call.
//!
//! Mutation takes `&mut self`; share one limiter across tasks only behind a
//! lock of the caller's choosing. Time comes from tokio's clock, so a paused
//! test runtime controls it.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Default spacing between requests
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    /// `None` until the first recorded request
    last_request: Option<Instant>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// True once `min_interval` has elapsed since the last recorded request
    pub fn can_make_request(&self) -> bool {
        self.can_make_request_at(Instant::now())
    }

    /// Remaining wait before the next request, zero if already allowed
    pub fn time_until_next_request(&self) -> Duration {
        self.time_until_next_request_at(Instant::now())
    }

    /// Stamp now as the time of the last request
    pub fn record_request(&mut self) {
        self.record_request_at(Instant::now());
    }

    /// Sleep until a request is allowed, then record it
    pub async fn acquire(&mut self) {
        let wait = self.time_until_next_request();
        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Rate limiter delaying request");
            tokio::time::sleep(wait).await;
        }
        self.record_request();
    }

    pub fn can_make_request_at(&self, now: Instant) -> bool {
        match self.last_request {
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
            None => true,
        }
    }

    pub fn time_until_next_request_at(&self, now: Instant) -> Duration {
        match self.last_request {
            Some(last) => self
                .min_interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    pub fn record_request_at(&mut self, now: Instant) {
        self.last_request = Some(now);
    }
}
