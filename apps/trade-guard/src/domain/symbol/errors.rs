//! Errors for symbol constraints and normalization.

use rust_decimal::Decimal;
use thiserror::Error;

/// A volume could not be placed on the broker's lot grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VolumeError {
    /// After rounding down to the step, the volume fell below the broker minimum.
    #[error("volume {requested} rounds to {normalized}, below broker minimum {min}")]
    BelowMinimum {
        /// Volume the caller asked for.
        requested: Decimal,
        /// Volume after step rounding and max capping.
        normalized: Decimal,
        /// Broker minimum volume.
        min: Decimal,
    },

    /// The volume step is zero or negative.
    #[error("volume step must be positive, got {0}")]
    InvalidStep(Decimal),

    /// Dividing the volume by the step does not fit in a `Decimal`.
    #[error("volume {volume} cannot be placed on a grid of step {step}")]
    Overflow {
        /// Volume the caller asked for.
        volume: Decimal,
        /// Volume step.
        step: Decimal,
    },

    /// The `[min, max]` volume range is empty or negative.
    #[error("invalid volume range [{min}, {max}]")]
    InvalidRange {
        /// Broker minimum volume.
        min: Decimal,
        /// Broker maximum volume.
        max: Decimal,
    },
}

/// A constraints snapshot returned by the gateway is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintsError {
    /// A field that must be strictly positive is not.
    #[error("{symbol}: {field} must be positive, got {value}")]
    NonPositive {
        /// Symbol the snapshot belongs to.
        symbol: String,
        /// Offending field name.
        field: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// Volume limits are inconsistent.
    #[error("{symbol}: volume_min {min} exceeds volume_max {max}")]
    InvertedVolumeRange {
        /// Symbol the snapshot belongs to.
        symbol: String,
        /// Broker minimum volume.
        min: Decimal,
        /// Broker maximum volume.
        max: Decimal,
    },
}
