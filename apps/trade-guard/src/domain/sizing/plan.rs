//! Order plan produced from a sized risk request.

use rust_decimal::Decimal;

use super::error::SizingError;
use super::types::{RiskRequest, SizedVolume};
use crate::domain::shared::{PriceQuote, Side, Symbol};
use crate::domain::symbol::{SymbolConstraints, normalize_price, points_to_price};

/// A fully computed market order, ready for submission.
///
/// Deliberately not `Clone`: a plan is handed to the submitter by value and
/// consumed exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct OrderPlan {
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Order side.
    pub side: Side,
    /// Volume on the broker's lot grid.
    pub volume: Decimal,
    /// Expected entry price (ask for buys, bid for sells).
    pub entry_price: Decimal,
    /// Absolute stop-loss price.
    pub stop_loss: Decimal,
    /// Absolute take-profit price, if requested.
    pub take_profit: Option<Decimal>,
    /// Money lost at the stop with this volume.
    pub realized_risk: Decimal,
}

impl OrderPlan {
    /// Build a plan from a sized request and the current quote.
    ///
    /// Stop-loss sits `stop_distance_points` against the entry, take-profit
    /// `take_profit_points` in favor; both are rounded to the symbol digits.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidInput`] if a distance is too large to
    /// turn into a price.
    pub fn from_sized(
        request: &RiskRequest,
        sized: &SizedVolume,
        constraints: &SymbolConstraints,
        quote: &PriceQuote,
    ) -> Result<Self, SizingError> {
        let entry_price = quote.entry_price(request.side);
        let sign = request.side.sign();

        // Price `points` away from the entry, in favor when `direction` is 1.
        let offset = |label: &str, points: Decimal, direction: Decimal| {
            points_to_price(points, constraints.point)
                .and_then(|distance| distance.checked_mul(sign * direction))
                .and_then(|delta| entry_price.checked_add(delta))
                .map(|price| normalize_price(price, constraints.digits))
                .ok_or_else(|| {
                    SizingError::InvalidInput(format!(
                        "{label} distance of {points} points is out of range"
                    ))
                })
        };

        let stop_loss = offset("stop-loss", request.stop_distance_points, Decimal::NEGATIVE_ONE)?;
        let take_profit = request
            .take_profit_points
            .map(|points| offset("take-profit", points, Decimal::ONE))
            .transpose()?;

        Ok(Self {
            symbol: request.symbol.clone(),
            side: request.side,
            volume: sized.volume,
            entry_price,
            stop_loss,
            take_profit,
            realized_risk: sized.realized_risk,
        })
    }
}
