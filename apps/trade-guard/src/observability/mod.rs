//! Observability module for metrics.
//!
//! Tracing setup lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    record_operation_attempts, record_operation_failure, record_retry_attempt,
    record_trailing_update, update_trailing_sessions,
};
