//! Core types for risk sizing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Side, Symbol};

/// What to do when a risk-sized volume rounds below the broker minimum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimumLotPolicy {
    /// Fail the sizing request.
    #[default]
    Reject,
    /// Trade the broker minimum instead. Realized risk then exceeds the budget.
    UseBrokerMinimum,
}

/// Input for risk-based sizing. Consumed once to produce an order plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRequest {
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Direction of the order.
    pub side: Side,
    /// Stop-loss distance from entry, in points. Must be positive.
    pub stop_distance_points: Decimal,
    /// Money lost if the stop is hit, in account currency. Must be positive.
    pub risk_money: Decimal,
    /// Optional take-profit distance from entry, in points.
    pub take_profit_points: Option<Decimal>,
}

impl RiskRequest {
    /// Create a request without take-profit.
    #[must_use]
    pub fn new(
        symbol: impl Into<Symbol>,
        side: Side,
        stop_distance_points: Decimal,
        risk_money: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            stop_distance_points,
            risk_money,
            take_profit_points: None,
        }
    }

    /// Set a take-profit distance in points.
    #[must_use]
    pub const fn with_take_profit_points(mut self, points: Decimal) -> Self {
        self.take_profit_points = Some(points);
        self
    }
}

/// Result of sizing a [`RiskRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizedVolume {
    /// Volume before grid normalization.
    pub raw_volume: Decimal,
    /// Volume on the broker's lot grid.
    pub volume: Decimal,
    /// Money lost at the stop with the normalized volume.
    pub realized_risk: Decimal,
    /// Whether the broker minimum was substituted for a smaller volume.
    pub substituted_minimum: bool,
}
