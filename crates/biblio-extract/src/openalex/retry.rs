//! Bounded exponential backoff for API requests

use crate::error::{ExtractError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Retry schedule for transient failures.
///
/// The wait after failed attempt `n` (1-based) is
/// `multiplier * 2^(n-1)`, clamped to `[min_delay, max_delay]`. With the
/// defaults that is 5s, 10s, 16s, 16s across five attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub multiplier: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            multiplier: Duration::from_secs(5),
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(16),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_delays(mut self, multiplier: Duration, min: Duration, max: Duration) -> Self {
        self.multiplier = multiplier;
        self.min_delay = min;
        self.max_delay = max;
        self
    }

    /// Wait before the attempt following failed attempt `attempt`
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.multiplier
            .saturating_mul(factor)
            .max(self.min_delay)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails non-transiently, or attempts run out.
    ///
    /// Non-transient errors are returned as-is after a single attempt.
    /// Running out of attempts yields [`ExtractError::RetriesExhausted`]
    /// wrapping the last transient error.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => return Err(err),
                Err(err) if attempt >= self.max_attempts => {
                    return Err(ExtractError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(err),
                    });
                },
                Err(err) => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        request = what,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                },
            }
        }
    }
}
