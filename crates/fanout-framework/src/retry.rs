//! # Bounded Retry
//!
//! Adapters never retry. A caller that wants a second attempt wraps the call
//! in a [`RetryPolicy`], which retries only connection-level failures
//! ([`BackendFailure::is_retryable`]) and only up to `max_attempts`. The
//! policy itself does not know about the request budget; callers run it
//! inside a [`FanOut`](crate::FanOut) or a `tokio::time::timeout`, which
//! cuts the loop short when the budget elapses.

use crate::backend::BackendResult;
use crate::error::BackendFailure;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt.
    pub const NONE: RetryPolicy = RetryPolicy {
        max_attempts: 1,
        backoff: Duration::ZERO,
    };

    /// `retries` additional attempts, sleeping `backoff * attempt` in between.
    pub fn new(retries: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub async fn run<F, Fut>(&self, mut attempt: F) -> BackendResult
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = BackendResult>,
    {
        let mut made = 1;
        loop {
            match attempt().await {
                Err(failure) if self.should_retry(&failure, made) => {
                    debug!(attempt = made, error = %failure, "Retrying");
                    tokio::time::sleep(self.backoff * made).await;
                    made += 1;
                }
                outcome => return outcome,
            }
        }
    }

    fn should_retry(&self, failure: &BackendFailure, made: u32) -> bool {
        made < self.max_attempts && failure.is_retryable()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}
