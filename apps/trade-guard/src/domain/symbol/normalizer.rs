//! Pure price and volume normalization.
//!
//! # Rules
//!
//! | Value | Rule |
//! |-------|------|
//! | Price | Round to `digits` decimals, midpoint away from zero |
//! | Volume | Round *down* to `step`, cap at the largest on-grid value ≤ `max` |
//! | Volume below `min` | Hard failure, never bumped up |

use rust_decimal::{Decimal, RoundingStrategy};

use super::errors::VolumeError;

/// Round a price to the symbol's digit precision.
#[must_use]
pub fn normalize_price(price: Decimal, digits: u32) -> Decimal {
    price
        .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Round a value down to the nearest multiple of `step`.
///
/// Returns `None` if `step` is not positive or `value / step` does not fit
/// in a `Decimal`.
#[must_use]
pub fn floor_to_step(value: Decimal, step: Decimal) -> Option<Decimal> {
    if step <= Decimal::ZERO {
        return None;
    }
    value
        .checked_div(step)?
        .floor()
        .checked_mul(step)
        .map(|v| v.normalize())
}

/// Returns true if `value` is an exact multiple of `step`.
#[must_use]
pub fn is_on_step(value: Decimal, step: Decimal) -> bool {
    step > Decimal::ZERO && (value % step).is_zero()
}

/// Convert a distance in points to a price distance, `None` on overflow.
#[must_use]
pub fn points_to_price(points: Decimal, point: Decimal) -> Option<Decimal> {
    points.checked_mul(point)
}

/// Place a volume on the broker's `[min, max]` grid of `step` increments.
///
/// Computes `min(floor_to_step(volume), floor_to_step(max))`. A result
/// below `min` is reported as [`VolumeError::BelowMinimum`]; substituting the
/// broker minimum is a caller decision.
///
/// # Errors
///
/// Returns an error if `step` is not positive, the range is invalid, the
/// volume overflows the grid arithmetic, or the rounded volume is below `min`.
pub fn normalize_volume(
    volume: Decimal,
    min: Decimal,
    step: Decimal,
    max: Decimal,
) -> Result<Decimal, VolumeError> {
    if step <= Decimal::ZERO {
        return Err(VolumeError::InvalidStep(step));
    }
    if min < Decimal::ZERO || max < min {
        return Err(VolumeError::InvalidRange { min, max });
    }

    let overflow = || VolumeError::Overflow { volume, step };
    let cap = floor_to_step(max, step).ok_or_else(overflow)?;
    let normalized = floor_to_step(volume, step).ok_or_else(overflow)?.min(cap);

    if normalized < min || normalized <= Decimal::ZERO {
        return Err(VolumeError::BelowMinimum {
            requested: volume,
            normalized,
            min,
        });
    }

    Ok(normalized)
}
