//! Error types for risk sizing.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error during risk-based sizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    /// Precondition violated (non-positive distance or budget).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The symbol constraints cannot be used for sizing.
    #[error("Invalid symbol constraints: {0}")]
    InvalidConstraints(String),

    /// The sized volume rounds below the broker minimum and the policy rejects it.
    #[error("Sized volume {raw} rounds to {normalized}, below broker minimum {min}")]
    BelowMinimum {
        /// Volume before grid normalization.
        raw: Decimal,
        /// Volume after step rounding.
        normalized: Decimal,
        /// Broker minimum volume.
        min: Decimal,
    },
}
