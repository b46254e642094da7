use rust_decimal::Decimal;
use thiserror::Error;

/// Errors resolving a partial close.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartialCloseError {
    /// Percent outside `(0, 100]`.
    #[error("close percent must be in (0, 100], got {0}")]
    InvalidPercent(Decimal),

    /// Exact volume is zero or negative.
    #[error("close volume must be positive, got {0}")]
    InvalidVolume(Decimal),

    /// Neither or both of percent and exact volume were given.
    #[error("exactly one of percent or exact volume is required")]
    AmbiguousAmount,

    /// The position has nothing left to close.
    #[error("position has no open volume")]
    NoOpenVolume,

    /// The symbol's lot step is unusable.
    #[error("volume step must be positive, got {0}")]
    InvalidStep(Decimal),

    /// The close volume does not fit in a `Decimal`.
    #[error("close volume out of range for position volume {0}")]
    VolumeOverflow(Decimal),

    /// Step rounding left less than the broker minimum.
    #[error("close volume {requested} rounds down to {rounded}, below minimum lot {min}")]
    BelowMinimumAfterRounding {
        /// Volume before rounding.
        requested: Decimal,
        /// Volume after rounding down to the step.
        rounded: Decimal,
        /// Broker minimum volume.
        min: Decimal,
    },
}
