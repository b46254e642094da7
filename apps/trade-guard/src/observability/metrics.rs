//! Metrics for retries, failures and trailing sessions.
//!
//! Recorded through the `metrics` facade; installing an exporter is the
//! embedding application's job. Without one, every call is a no-op.
//!
//! # Metrics
//!
//! | Name | Type | Labels |
//! |------|------|--------|
//! | `trade_guard_retry_attempts_total` | counter | `operation` |
//! | `trade_guard_operation_failures_total` | counter | `operation`, `kind` |
//! | `trade_guard_operation_attempts` | histogram | `operation` |
//! | `trade_guard_trailing_updates_total` | counter | `outcome` |
//! | `trade_guard_trailing_sessions` | gauge | |

use metrics::{counter, gauge, histogram};

use crate::error::FailureKind;

// ============================================================================
// Retry Metrics
// ============================================================================

/// Record a retry scheduled after a transient failure.
///
/// # Arguments
///
/// * `operation` - Operation name (e.g., `"send_market_order"`)
pub fn record_retry_attempt(operation: &str) {
    counter!(
        "trade_guard_retry_attempts_total",
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Record an operation that gave up.
///
/// # Arguments
///
/// * `operation` - Operation name
/// * `kind` - Failure classification
pub fn record_operation_failure(operation: &str, kind: FailureKind) {
    counter!(
        "trade_guard_operation_failures_total",
        "operation" => operation.to_string(),
        "kind" => kind.reason()
    )
    .increment(1);
}

/// Record how many attempts an operation took, successful or not.
pub fn record_operation_attempts(operation: &str, attempts: u32) {
    histogram!(
        "trade_guard_operation_attempts",
        "operation" => operation.to_string()
    )
    .record(f64::from(attempts));
}

// ============================================================================
// Trailing Metrics
// ============================================================================

/// Record the outcome of a trailing stop update (`"applied"` or `"failed"`).
pub fn record_trailing_update(outcome: &'static str) {
    counter!("trade_guard_trailing_updates_total", "outcome" => outcome).increment(1);
}

/// Update the active trailing sessions gauge.
pub fn update_trailing_sessions(count: usize) {
    #[allow(clippy::cast_precision_loss)]
    gauge!("trade_guard_trailing_sessions").set(count as f64);
}
