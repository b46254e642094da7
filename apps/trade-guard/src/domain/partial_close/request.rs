//! Partial close request value objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::PartialCloseError;
use crate::domain::shared::Ticket;

/// How much of a position to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseAmount {
    /// Percentage of the current volume, `0 < p ≤ 100`.
    Percent(Decimal),
    /// Absolute volume in lots, clamped to the current volume.
    ExactVolume(Decimal),
}

impl CloseAmount {
    /// Check the amount is in range.
    ///
    /// # Errors
    ///
    /// Returns an error for a percent outside `(0, 100]` or a non-positive volume.
    pub fn validate(&self) -> Result<(), PartialCloseError> {
        match *self {
            Self::Percent(p) if p <= Decimal::ZERO || p > Decimal::ONE_HUNDRED => {
                Err(PartialCloseError::InvalidPercent(p))
            }
            Self::ExactVolume(v) if v <= Decimal::ZERO => Err(PartialCloseError::InvalidVolume(v)),
            _ => Ok(()),
        }
    }

    /// Volume this amount asks for out of `current_volume`, before rounding.
    ///
    /// # Errors
    ///
    /// Returns [`PartialCloseError::VolumeOverflow`] if the product does not
    /// fit in a `Decimal`.
    pub fn requested_volume(&self, current_volume: Decimal) -> Result<Decimal, PartialCloseError> {
        match *self {
            Self::Percent(p) => (p / Decimal::ONE_HUNDRED)
                .checked_mul(current_volume)
                .ok_or(PartialCloseError::VolumeOverflow(current_volume)),
            Self::ExactVolume(v) => Ok(v.min(current_volume)),
        }
    }
}

/// Request to close part of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialCloseRequest {
    /// Position to reduce.
    pub ticket: Ticket,
    /// Amount to close.
    pub amount: CloseAmount,
}

impl PartialCloseRequest {
    /// Close `percent` of the position.
    #[must_use]
    pub const fn percent(ticket: Ticket, percent: Decimal) -> Self {
        Self {
            ticket,
            amount: CloseAmount::Percent(percent),
        }
    }

    /// Close an exact volume.
    #[must_use]
    pub const fn volume(ticket: Ticket, volume: Decimal) -> Self {
        Self {
            ticket,
            amount: CloseAmount::ExactVolume(volume),
        }
    }

    /// Build from optional fields, requiring exactly one of them.
    ///
    /// # Errors
    ///
    /// Returns [`PartialCloseError::AmbiguousAmount`] if both or neither are set,
    /// or a range error for the one that is.
    pub fn from_parts(
        ticket: Ticket,
        percent: Option<Decimal>,
        exact_volume: Option<Decimal>,
    ) -> Result<Self, PartialCloseError> {
        let amount = match (percent, exact_volume) {
            (Some(p), None) => CloseAmount::Percent(p),
            (None, Some(v)) => CloseAmount::ExactVolume(v),
            _ => return Err(PartialCloseError::AmbiguousAmount),
        };
        amount.validate()?;
        Ok(Self { ticket, amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn from_parts_requires_exactly_one_amount() {
        let ticket = Ticket::new(7);
        assert_eq!(
            PartialCloseRequest::from_parts(ticket, None, None),
            Err(PartialCloseError::AmbiguousAmount)
        );
        assert_eq!(
            PartialCloseRequest::from_parts(ticket, Some(dec!(50)), Some(dec!(0.1))),
            Err(PartialCloseError::AmbiguousAmount)
        );
        assert_eq!(
            PartialCloseRequest::from_parts(ticket, Some(dec!(50)), None),
            Ok(PartialCloseRequest::percent(ticket, dec!(50)))
        );
    }

    #[test]
    fn from_parts_checks_ranges() {
        let ticket = Ticket::new(7);
        assert_eq!(
            PartialCloseRequest::from_parts(ticket, Some(dec!(100.5)), None),
            Err(PartialCloseError::InvalidPercent(dec!(100.5)))
        );
        assert_eq!(
            PartialCloseRequest::from_parts(ticket, None, Some(dec!(0))),
            Err(PartialCloseError::InvalidVolume(dec!(0)))
        );
    }

    #[test]
    fn exact_volume_is_clamped_to_position() {
        assert_eq!(CloseAmount::ExactVolume(dec!(2)).requested_volume(dec!(0.5)), Ok(dec!(0.5)));
        assert_eq!(CloseAmount::Percent(dec!(50)).requested_volume(dec!(0.07)), Ok(dec!(0.035)));
    }

    #[test]
    fn requested_volume_reports_overflow() {
        assert_eq!(
            CloseAmount::Percent(dec!(100)).requested_volume(Decimal::MAX),
            Ok(Decimal::MAX)
        );
        assert_eq!(
            CloseAmount::Percent(dec!(250)).requested_volume(Decimal::MAX),
            Err(PartialCloseError::VolumeOverflow(Decimal::MAX))
        );
    }
}
