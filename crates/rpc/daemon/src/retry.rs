//! Bounded retry with linear backoff.

use std::{future::Future, time::Duration};
use tracing::debug;

/// Bounded retry policy: attempt `i` (zero based) first sleeps `i * step`.
///
/// The error of the final attempt is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Backoff unit.
    pub step: Duration,
}

impl RetryPolicy {
    /// Create a new policy.
    pub const fn new(max_attempts: u32, step: Duration) -> Self {
        Self { max_attempts, step }
    }

    /// Effective number of attempts.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before the zero-based `attempt`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt)
    }

    /// Run `op` until it succeeds or attempts are exhausted.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.attempts();
        let mut attempt = 0;
        loop {
            let delay = self.delay_before(attempt);
            if !delay.is_zero() {
                debug!(
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    sleep_ms = delay.as_millis() as u64,
                    "retrying"
                );
                tokio::time::sleep(delay).await;
            }

            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 >= attempts => return Err(e),
                Err(_) => attempt += 1,
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1))
    }
}
