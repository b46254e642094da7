//! Retry executor with capped exponential backoff for mutating gateway calls.
//!
//! Each [`RetryExecutor::execute`] call owns its own [`BackoffSchedule`], so
//! attempt counts and delays are never shared between operations.
//!
//! # Retry Decisions
//!
//! | Failure kind | Action |
//! |--------------|--------|
//! | `Transient` | Sleep, grow delay, retry while attempts remain |
//! | `Validation` / `Business` / `NotFound` | Return immediately |
//! | Cancelled while sleeping | Return `Cancelled` without another attempt |
//!
//! # Example
//!
//! ```rust,ignore
//! let executor = RetryExecutor::new(RetryPolicy::default());
//! let result = executor
//!     .execute("send_market_order", &cancel, || async {
//!         gateway.send_market_order(request.clone()).await?.into_accepted()
//!     })
//!     .await?;
//! ```

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{Failure, FailureKind};
use crate::observability::{
    record_operation_attempts, record_operation_failure, record_retry_attempt,
};

/// Retry policy for one class of operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first (default: 3). `1` disables retry.
    pub max_attempts: u32,
    /// Delay before the second attempt (default: 100ms).
    pub initial_delay: Duration,
    /// Ceiling for any single delay (default: 5s).
    pub max_delay: Duration,
    /// Growth factor between delays (default: 2.0).
    pub multiplier: f64,
    /// Random spread applied to each delay, `0.0..=1.0` (default: 0.0).
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }
}

impl RetryPolicy {
    /// Create a doubling policy without jitter.
    #[must_use]
    pub const fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
            multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }

    /// Single attempt, no retry.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Set the jitter factor.
    #[must_use]
    pub const fn with_jitter(mut self, jitter_factor: f64) -> Self {
        self.jitter_factor = jitter_factor;
        self
    }
}

/// Exponential delay sequence for one operation.
#[derive(Debug)]
pub struct BackoffSchedule {
    next_delay_ms: f64,
    max_delay_ms: f64,
    multiplier: f64,
    jitter_factor: f64,
}

impl BackoffSchedule {
    /// Start a schedule at the policy's initial delay.
    #[must_use]
    pub fn new(policy: &RetryPolicy) -> Self {
        let max_delay_ms = policy.max_delay.as_secs_f64() * 1000.0;
        Self {
            next_delay_ms: (policy.initial_delay.as_secs_f64() * 1000.0).min(max_delay_ms),
            max_delay_ms,
            multiplier: policy.multiplier.max(1.0),
            jitter_factor: policy.jitter_factor.clamp(0.0, 1.0),
        }
    }

    /// Delay to wait before the next attempt. Never exceeds the cap.
    pub fn next_delay(&mut self) -> Duration {
        let base_ms = self.next_delay_ms;
        self.next_delay_ms = (base_ms * self.multiplier).min(self.max_delay_ms);

        let delay_ms = self.apply_jitter(base_ms).min(self.max_delay_ms);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Duration::from_millis(delay_ms.round() as u64)
    }

    /// Spread `delay_ms` uniformly over `[d * (1 - j), d * (1 + j)]`.
    fn apply_jitter(&self, delay_ms: f64) -> f64 {
        if self.jitter_factor <= 0.0 || delay_ms <= 0.0 {
            return delay_ms;
        }
        let spread = delay_ms * self.jitter_factor;
        rand::rng().random_range((delay_ms - spread).max(0.0)..=delay_ms + spread)
    }
}

/// Runs single-attempt operations under a [`RetryPolicy`].
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create an executor with the given policy.
    #[must_use]
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Get the policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, runs out
    /// of attempts, or `cancel` fires during a backoff sleep.
    ///
    /// Attempts are strictly sequential. An in-flight attempt is allowed to
    /// finish; cancellation only stops further attempts.
    ///
    /// # Errors
    ///
    /// Returns the last [`Failure`] with the number of attempts made, or a
    /// `Cancelled` failure if `cancel` fired.
    pub async fn execute<T, E, F, Fut>(
        &self,
        operation: &str,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<T, Failure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<Failure>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut backoff = BackoffSchedule::new(&self.policy);
        let mut attempt = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(cancelled(operation, attempt));
            }
            attempt += 1;

            let failure: Failure = match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(operation, attempt, "Operation succeeded after retry");
                    }
                    record_operation_attempts(operation, attempt);
                    return Ok(value);
                }
                Err(err) => err.into(),
            };

            if !failure.kind.is_retryable() || attempt >= max_attempts {
                tracing::debug!(
                    operation,
                    attempt,
                    kind = %failure.kind,
                    error = %failure.message,
                    "Operation failed"
                );
                record_operation_attempts(operation, attempt);
                record_operation_failure(operation, failure.kind);
                return Err(failure.with_attempts(attempt));
            }

            let delay = backoff.next_delay();
            tracing::warn!(
                operation,
                attempt,
                max_attempts,
                delay_ms = delay.as_millis(),
                reason = %failure.message,
                "Transient failure, retrying"
            );
            record_retry_attempt(operation);

            tokio::select! {
                () = cancel.cancelled() => {
                    record_operation_failure(operation, FailureKind::Cancelled);
                    return Err(cancelled(operation, attempt));
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
}

fn cancelled(operation: &str, attempts: u32) -> Failure {
    Failure::new(
        FailureKind::Cancelled,
        format!("{operation} cancelled"),
        attempts,
    )
}
