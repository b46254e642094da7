//! Per-session trailing ratchet.
//!
//! Long: `candidate = reference - distance * point`, short mirrors with `+`.
//! In chandelier mode the reference is the best exit price seen so far
//! (running max bid for longs, running min ask for shorts), so the stop keeps
//! its level through pullbacks.

use rust_decimal::Decimal;

use super::params::{TrailMode, TrailParams};
use crate::domain::shared::Side;
use crate::domain::symbol::{normalize_price, points_to_price};

/// Mutable state of one trailing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailState {
    side: Side,
    mode: TrailMode,
    distance_points: Decimal,
    step_points: Decimal,
    extreme: Option<Decimal>,
    last_applied: Option<Decimal>,
}

impl TrailState {
    /// Start a session, seeded with the position's current stop-loss if any.
    #[must_use]
    pub fn new(params: &TrailParams, existing_stop_loss: Option<Decimal>) -> Self {
        Self {
            side: params.side,
            mode: params.mode,
            distance_points: params.distance_points,
            step_points: params.step_points,
            extreme: None,
            last_applied: existing_stop_loss.filter(|sl| *sl > Decimal::ZERO),
        }
    }

    /// Last stop-loss applied (or the seed).
    #[must_use]
    pub const fn last_applied(&self) -> Option<Decimal> {
        self.last_applied
    }

    /// Feed the current exit price and get the stop-loss to apply, if any.
    ///
    /// `reference_price` is the bid for long positions and the ask for short
    /// ones. Returns `None` when the candidate does not improve the last
    /// applied stop by at least `max(step, 1)` points, or when the distance
    /// cannot be priced.
    pub fn evaluate(&mut self, reference_price: Decimal, point: Decimal, digits: u32) -> Option<Decimal> {
        let reference = match self.mode {
            TrailMode::Classic => reference_price,
            TrailMode::Chandelier => {
                let extreme = match (self.extreme, self.side) {
                    (None, _) => reference_price,
                    (Some(prev), Side::Buy) => prev.max(reference_price),
                    (Some(prev), Side::Sell) => prev.min(reference_price),
                };
                self.extreme = Some(extreme);
                extreme
            }
        };

        let distance = points_to_price(self.distance_points, point)?;
        let candidate =
            normalize_price(reference.checked_sub(self.side.sign() * distance)?, digits);
        if candidate <= Decimal::ZERO {
            return None;
        }

        let Some(last) = self.last_applied else {
            return Some(candidate);
        };

        let improvement = self.side.sign() * (candidate - last);
        let threshold = points_to_price(self.step_points, point)?.max(point);
        (improvement >= threshold).then_some(candidate)
    }

    /// Record a stop-loss the gateway accepted.
    ///
    /// Ignored if it would loosen the ratchet.
    pub fn record_applied(&mut self, stop_loss: Decimal) {
        let tighter = match self.last_applied {
            None => true,
            Some(last) => self.side.sign() * (stop_loss - last) > Decimal::ZERO,
        };
        if tighter {
            self.last_applied = Some(stop_loss);
        }
    }
}
