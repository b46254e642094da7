//! Typed failures surfaced by the application layer.
//!
//! Every operation that crosses the gateway returns a [`Failure`]. Its
//! [`FailureKind`] is decided once, where the underlying error is produced,
//! so the retry executor branches on data instead of matching error types.
//!
//! # Kinds
//!
//! | Kind | Retried | Source |
//! |------|---------|--------|
//! | `Transient` | yes | Transport errors, connection-class return codes |
//! | `Validation` | no | Bad input, volume below minimum, malformed pending order |
//! | `Business` | no | Broker-side rejection (invalid price, no money, market closed) |
//! | `NotFound` | no | Position or order no longer exists |
//! | `Cancelled` | no | Caller cancelled while waiting |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::GatewayError;
use crate::domain::partial_close::PartialCloseError;
use crate::domain::pending::ValidationErrors;
use crate::domain::sizing::SizingError;
use crate::domain::symbol::{ConstraintsError, VolumeError};
use crate::domain::trailing::TrailError;

/// Failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// Connectivity or transient dealer rejection.
    Transient,
    /// Caller input cannot be executed as given.
    Validation,
    /// Broker rejected the request for a non-transient reason.
    Business,
    /// Referenced ticket no longer exists.
    NotFound,
    /// Cancelled before completion.
    Cancelled,
}

impl FailureKind {
    /// Whether another attempt may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient)
    }

    /// Stable reason string, used as a metrics label.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Transient => "TRANSIENT",
            Self::Validation => "VALIDATION",
            Self::Business => "BUSINESS",
            Self::NotFound => "NOT_FOUND",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A classified failure with the number of attempts made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{kind}] {message} (attempts: {attempts})")]
pub struct Failure {
    /// Classification.
    pub kind: FailureKind,
    /// Human-readable detail.
    pub message: String,
    /// Attempts made before giving up. Zero for failures raised before any
    /// gateway call.
    pub attempts: u32,
}

impl Failure {
    /// Create a failure.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>, attempts: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            attempts,
        }
    }

    /// Validation failure raised before any gateway call.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message, 0)
    }

    /// Not-found failure.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, message, 0)
    }

    /// Replace the attempt count.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Returns true if the kind matches.
    #[must_use]
    pub fn is(&self, kind: FailureKind) -> bool {
        self.kind == kind
    }
}

impl From<GatewayError> for Failure {
    fn from(err: GatewayError) -> Self {
        Self::new(err.kind(), err.to_string(), 1)
    }
}

macro_rules! validation_from {
    ($($err:ty),+ $(,)?) => {
        $(
            impl From<$err> for Failure {
                fn from(err: $err) -> Self {
                    Self::validation(err.to_string())
                }
            }
        )+
    };
}

validation_from!(
    SizingError,
    VolumeError,
    ConstraintsError,
    PartialCloseError,
    ValidationErrors,
    TrailError,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::RetCode;
    use rust_decimal_macros::dec;

    #[test]
    fn test_failure_display() {
        let failure = Failure::new(FailureKind::Transient, "gateway unreachable", 3);
        assert_eq!(
            failure.to_string(),
            "[TRANSIENT] gateway unreachable (attempts: 3)"
        );
    }

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(FailureKind::Transient.is_retryable());
        for kind in [
            FailureKind::Validation,
            FailureKind::Business,
            FailureKind::NotFound,
            FailureKind::Cancelled,
        ] {
            assert!(!kind.is_retryable());
        }
    }

    #[test]
    fn test_gateway_errors_keep_their_kind() {
        let failure: Failure = GatewayError::Rejected {
            ret_code: RetCode::NO_MONEY,
            description: "no money".to_string(),
        }
        .into();
        assert_eq!(failure.kind, FailureKind::Business);
        assert_eq!(failure.attempts, 1);

        let failure: Failure = GatewayError::Transport("reset".to_string()).into();
        assert!(failure.is(FailureKind::Transient));
    }

    #[test]
    fn test_domain_errors_are_validation() {
        let failure: Failure = VolumeError::InvalidStep(dec!(0)).into();
        assert_eq!(failure.kind, FailureKind::Validation);
        assert_eq!(failure.attempts, 0);
    }
}
