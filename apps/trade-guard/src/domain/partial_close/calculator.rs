//! Effective close volume.

use rust_decimal::Decimal;

use super::errors::PartialCloseError;
use super::request::PartialCloseRequest;
use crate::domain::symbol::{SymbolConstraints, floor_to_step};

/// Resolves a [`PartialCloseRequest`] to a broker-acceptable volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialCloseCalculator;

impl PartialCloseCalculator {
    /// Compute the effective close volume.
    ///
    /// The requested volume is clamped to `current_volume`, rounded down to
    /// `volume_step` and capped at the on-grid `volume_max`. The result always
    /// satisfies `volume_min ≤ effective ≤ current_volume`.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is out of range, the position is empty,
    /// the step is unusable, the volume overflows the grid arithmetic, or
    /// rounding leaves less than `volume_min`.
    pub fn compute(
        request: &PartialCloseRequest,
        current_volume: Decimal,
        constraints: &SymbolConstraints,
    ) -> Result<Decimal, PartialCloseError> {
        request.amount.validate()?;

        if current_volume <= Decimal::ZERO {
            return Err(PartialCloseError::NoOpenVolume);
        }
        let step = constraints.volume_step;
        if step <= Decimal::ZERO {
            return Err(PartialCloseError::InvalidStep(step));
        }

        let requested = request.amount.requested_volume(current_volume)?;
        let overflow = || PartialCloseError::VolumeOverflow(current_volume);
        let cap = floor_to_step(constraints.volume_max, step).ok_or_else(overflow)?;
        let rounded = floor_to_step(requested, step).ok_or_else(overflow)?.min(cap);

        if rounded < constraints.volume_min || rounded <= Decimal::ZERO {
            return Err(PartialCloseError::BelowMinimumAfterRounding {
                requested,
                rounded,
                min: constraints.volume_min,
            });
        }

        Ok(rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{Symbol, Ticket};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn constraints() -> SymbolConstraints {
        SymbolConstraints {
            symbol: Symbol::new("EURUSD"),
            point: dec!(0.00001),
            digits: 5,
            volume_min: dec!(0.01),
            volume_step: dec!(0.01),
            volume_max: dec!(100),
            tick_value: dec!(1),
            tick_size: dec!(0.00001),
        }
    }

    fn ticket() -> Ticket {
        Ticket::new(42)
    }

    #[test]
    fn test_half_of_odd_volume_rounds_down() {
        let request = PartialCloseRequest::percent(ticket(), dec!(50));

        let volume = PartialCloseCalculator::compute(&request, dec!(0.07), &constraints())
            .expect("should compute");

        assert_eq!(volume, dec!(0.03));
    }

    #[test]
    fn test_full_percent_closes_everything() {
        let request = PartialCloseRequest::percent(ticket(), dec!(100));

        let volume = PartialCloseCalculator::compute(&request, dec!(1.37), &constraints())
            .expect("should compute");

        assert_eq!(volume, dec!(1.37));
    }

    #[test]
    fn test_exact_volume_above_position_is_clamped() {
        let request = PartialCloseRequest::volume(ticket(), dec!(5));

        let volume = PartialCloseCalculator::compute(&request, dec!(0.4), &constraints())
            .expect("should compute");

        assert_eq!(volume, dec!(0.4));
    }

    #[test]
    fn test_off_grid_exact_volume_rounds_down() {
        let request = PartialCloseRequest::volume(ticket(), dec!(0.129));

        let volume = PartialCloseCalculator::compute(&request, dec!(1), &constraints())
            .expect("should compute");

        assert_eq!(volume, dec!(0.12));
    }

    #[test]
    fn test_below_minimum_after_rounding_fails() {
        let request = PartialCloseRequest::percent(ticket(), dec!(10));

        let result = PartialCloseCalculator::compute(&request, dec!(0.05), &constraints());

        assert_eq!(
            result,
            Err(PartialCloseError::BelowMinimumAfterRounding {
                requested: dec!(0.005),
                rounded: dec!(0),
                min: dec!(0.01),
            })
        );
    }

    #[test]
    fn test_capped_at_volume_max() {
        let mut constraints = constraints();
        constraints.volume_max = dec!(50);
        let request = PartialCloseRequest::percent(ticket(), dec!(100));

        let volume = PartialCloseCalculator::compute(&request, dec!(80), &constraints)
            .expect("should compute");

        assert_eq!(volume, dec!(50));
    }

    #[test]
    fn test_empty_position_fails() {
        let request = PartialCloseRequest::percent(ticket(), dec!(50));

        let result = PartialCloseCalculator::compute(&request, Decimal::ZERO, &constraints());

        assert_eq!(result, Err(PartialCloseError::NoOpenVolume));
    }

    #[test]
    fn test_invalid_percent_fails_before_arithmetic() {
        let request = PartialCloseRequest::percent(ticket(), dec!(0));

        let result = PartialCloseCalculator::compute(&request, dec!(1), &constraints());

        assert_eq!(result, Err(PartialCloseError::InvalidPercent(dec!(0))));
    }

    #[test]
    fn test_huge_position_on_fine_grid_fails_without_panic() {
        let mut constraints = constraints();
        constraints.volume_step = dec!(0.00001);
        constraints.volume_max = Decimal::MAX;
        let request = PartialCloseRequest::percent(ticket(), dec!(100));

        let result = PartialCloseCalculator::compute(&request, Decimal::MAX, &constraints);

        assert_eq!(result, Err(PartialCloseError::VolumeOverflow(Decimal::MAX)));
    }

    proptest! {
        #[test]
        fn effective_volume_stays_on_grid_and_within_position(
            current in (1i64..100_000).prop_map(|n| Decimal::new(n, 2)),
            percent in (1i64..=10_000).prop_map(|n| Decimal::new(n, 2)),
        ) {
            let request = PartialCloseRequest::percent(ticket(), percent);
            if let Ok(volume) = PartialCloseCalculator::compute(&request, current, &constraints()) {
                prop_assert!(volume > Decimal::ZERO);
                prop_assert!(volume <= current);
                prop_assert!((volume % dec!(0.01)).is_zero());
            }
        }
    }
}
