//! Bounded exponential-backoff retries for transport operations.
//!
//! Attempt `n` that fails with a retryable error sleeps `base * 2^n` before
//! the next try (1s, 2s, 4s with the default base). No jitter.

use std::future::Future;
use std::time::Duration;
use tokio_retry::RetryIf;

use crate::log_sink::SharedLogSink;
use crate::utils::error::{AppError, Result};

/// Statuses worth another attempt: rate limiting, overload and timeouts.
pub const RETRYABLE_STATUSES: [u16; 4] = [429, 503, 504, 408];

pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Clone)]
pub struct RetryExecutor {
    base_delay: Duration,
    log_sink: Option<SharedLogSink>,
}

impl RetryExecutor {
    pub fn new(base_delay: Duration) -> Self {
        Self {
            base_delay,
            log_sink: None,
        }
    }

    /// Also reports every retry to `log_sink`.
    pub fn with_log_sink(mut self, log_sink: SharedLogSink) -> Self {
        self.log_sink = Some(log_sink);
        self
    }

    pub fn should_retry(error: &AppError, attempt: u32, max_retries: u32) -> bool {
        if attempt >= max_retries {
            return false;
        }
        match error.http_status() {
            Some(status) => RETRYABLE_STATUSES.contains(&status),
            // No status means the server never answered.
            None => true,
        }
    }

    /// Delay before the retry that follows failed attempt `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(31))
    }

    /// Runs `operation` up to `max_retries + 1` times.
    ///
    /// Returns the first success, or the error that was not retried.
    pub async fn execute_with_retry<T, F, Fut>(&self, operation: F, label: &str, max_retries: u32) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let schedule: Vec<Duration> = (0..max_retries).map(|attempt| self.backoff(attempt)).collect();
        let mut attempt = 0u32;

        RetryIf::start(schedule, operation, |err: &AppError| {
            let retry = Self::should_retry(err, attempt, max_retries);
            if retry {
                let delay = self.backoff(attempt);
                tracing::warn!(
                    operation = label,
                    attempt,
                    max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient failure, retrying after backoff"
                );
                if let Some(sink) = &self.log_sink {
                    sink.push(&format!(
                        "{}: attempt {} failed ({}), retrying in {}ms",
                        label,
                        attempt + 1,
                        err,
                        delay.as_millis()
                    ));
                }
            }
            attempt += 1;
            retry
        })
        .await
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}
