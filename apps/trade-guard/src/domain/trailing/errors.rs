use rust_decimal::Decimal;
use thiserror::Error;

/// Invalid trailing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrailError {
    /// Trailing distance must be positive.
    #[error("trailing distance must be positive, got {0} points")]
    InvalidDistance(Decimal),

    /// Step must not be negative.
    #[error("trailing step must not be negative, got {0} points")]
    InvalidStep(Decimal),
}
