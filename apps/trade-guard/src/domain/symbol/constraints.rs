//! Per-symbol trading constraints snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::ConstraintsError;
use crate::domain::shared::Symbol;

/// Immutable per-symbol snapshot of the broker's trading constraints.
///
/// A refresh produces a new snapshot; a snapshot is never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolConstraints {
    /// Symbol this snapshot describes.
    pub symbol: Symbol,
    /// Smallest price increment.
    pub point: Decimal,
    /// Decimal precision of prices.
    pub digits: u32,
    /// Minimum volume of one deal, in lots.
    pub volume_min: Decimal,
    /// Volume granularity, in lots.
    pub volume_step: Decimal,
    /// Maximum volume of one deal, in lots.
    pub volume_max: Decimal,
    /// Account-currency value of one `tick_size` move for one lot.
    pub tick_value: Decimal,
    /// Price move the `tick_value` refers to.
    pub tick_size: Decimal,
}

impl SymbolConstraints {
    /// Check the snapshot is usable for sizing and normalization.
    ///
    /// # Errors
    ///
    /// Returns an error if point, step, tick value or tick size is not
    /// positive, or if the volume range is inverted.
    pub fn validate(&self) -> Result<(), ConstraintsError> {
        let positive_fields = [
            ("point", self.point),
            ("volume_step", self.volume_step),
            ("volume_max", self.volume_max),
            ("tick_value", self.tick_value),
            ("tick_size", self.tick_size),
        ];

        for (field, value) in positive_fields {
            if value <= Decimal::ZERO {
                return Err(ConstraintsError::NonPositive {
                    symbol: self.symbol.to_string(),
                    field,
                    value,
                });
            }
        }

        if self.volume_min > self.volume_max {
            return Err(ConstraintsError::InvertedVolumeRange {
                symbol: self.symbol.to_string(),
                min: self.volume_min,
                max: self.volume_max,
            });
        }

        Ok(())
    }

    /// Account-currency value of a one-point move for one lot.
    ///
    /// `(point / tick_size) * tick_value`, or `None` if it does not fit in
    /// a `Decimal` or `tick_size` is zero.
    #[must_use]
    pub fn money_per_point_per_lot(&self) -> Option<Decimal> {
        self.point
            .checked_div(self.tick_size)?
            .checked_mul(self.tick_value)
    }
}
