//! Trailing session parameters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::TrailError;
use crate::domain::shared::{Side, Symbol, Ticket};

/// Reference price used to place the trailing stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailMode {
    /// Trail the current exit price.
    #[default]
    Classic,
    /// Trail the best exit price seen since the session started.
    Chandelier,
}

/// Parameters of one trailing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailParams {
    /// Position to protect.
    pub ticket: Ticket,
    /// Position symbol.
    pub symbol: Symbol,
    /// Position side.
    pub side: Side,
    /// Distance between reference price and stop, in points.
    pub distance_points: Decimal,
    /// Minimum improvement before the stop moves, in points.
    pub step_points: Decimal,
    /// Reference price mode.
    pub mode: TrailMode,
}

impl TrailParams {
    /// Classic trailing parameters.
    #[must_use]
    pub fn classic(
        ticket: Ticket,
        symbol: impl Into<Symbol>,
        side: Side,
        distance_points: Decimal,
        step_points: Decimal,
    ) -> Self {
        Self {
            ticket,
            symbol: symbol.into(),
            side,
            distance_points,
            step_points,
            mode: TrailMode::Classic,
        }
    }

    /// Switch the reference mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: TrailMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check distance and step.
    ///
    /// # Errors
    ///
    /// Returns an error if the distance is not positive or the step is negative.
    pub fn validate(&self) -> Result<(), TrailError> {
        if self.distance_points <= Decimal::ZERO {
            return Err(TrailError::InvalidDistance(self.distance_points));
        }
        if self.step_points < Decimal::ZERO {
            return Err(TrailError::InvalidStep(self.step_points));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn validate_rejects_bad_distances() {
        let params = TrailParams::classic(Ticket::new(1), "EURUSD", Side::Buy, dec!(0), dec!(10));
        assert_eq!(params.validate(), Err(TrailError::InvalidDistance(dec!(0))));

        let params = TrailParams::classic(Ticket::new(1), "EURUSD", Side::Buy, dec!(100), dec!(-1));
        assert_eq!(params.validate(), Err(TrailError::InvalidStep(dec!(-1))));

        let params = TrailParams::classic(Ticket::new(1), "EURUSD", Side::Buy, dec!(100), dec!(0));
        assert!(params.validate().is_ok());
    }
}
