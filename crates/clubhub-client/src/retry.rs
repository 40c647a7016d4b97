//! Retry with exponential backoff
//!
//! Attempt `n` (zero-based) that fails with a retryable error is followed by a
//! sleep of `base_delay * 2^n`. Client errors (4xx other than 429) fail fast.

use std::future::Future;
use std::time::Duration;

use clubhub_common::{ClientError, RetrySettings};
use tracing::warn;

/// How many times to retry and how long to wait before the first retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: settings.base_delay(),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Sleep after the failed attempt with the given zero-based index
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Errors that may carry an HTTP status
pub trait RetryableError {
    /// Status the server answered with, `None` for transport failures
    fn status(&self) -> Option<u16>;

    /// A 4xx other than 429 is not worth retrying
    fn is_permanent(&self) -> bool {
        self.status()
            .is_some_and(|s| (400..500).contains(&s) && s != 429)
    }
}

impl RetryableError for ClientError {
    fn status(&self) -> Option<u16> {
        ClientError::status(self)
    }
}

/// Run `op` until it succeeds, fails permanently or runs out of retries
///
/// Makes at most `max_retries + 1` attempts and returns the last error
/// unchanged.
pub async fn retry_with_backoff<T, E, F, Fut>(mut op: F, policy: RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_permanent() => return Err(e),
            Err(e) if attempt >= policy.max_retries => return Err(e),
            Err(e) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    status = ?e.status(),
                    "Request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
