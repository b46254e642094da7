//! Pending order types: the flat draft and the validated spec.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{Side, Symbol};

/// Price mechanism of a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    /// Fill at `price` or better.
    Limit,
    /// Become a market order when `price` trades.
    Stop,
    /// Place a limit order at `limit_price` once `stop_trigger` trades.
    StopLimit,
}

/// Pending order type: a [`PendingKind`] on a [`Side`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOrderType {
    /// Buy below the market.
    BuyLimit,
    /// Sell above the market.
    SellLimit,
    /// Buy above the market.
    BuyStop,
    /// Sell below the market.
    SellStop,
    /// Buy limit armed by a stop trigger above the market.
    BuyStopLimit,
    /// Sell limit armed by a stop trigger below the market.
    SellStopLimit,
}

impl PendingOrderType {
    /// Build a type from its side and kind.
    #[must_use]
    pub const fn from_parts(side: Side, kind: PendingKind) -> Self {
        match (side, kind) {
            (Side::Buy, PendingKind::Limit) => Self::BuyLimit,
            (Side::Sell, PendingKind::Limit) => Self::SellLimit,
            (Side::Buy, PendingKind::Stop) => Self::BuyStop,
            (Side::Sell, PendingKind::Stop) => Self::SellStop,
            (Side::Buy, PendingKind::StopLimit) => Self::BuyStopLimit,
            (Side::Sell, PendingKind::StopLimit) => Self::SellStopLimit,
        }
    }

    /// Side of the position the order opens.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::BuyLimit | Self::BuyStop | Self::BuyStopLimit => Side::Buy,
            Self::SellLimit | Self::SellStop | Self::SellStopLimit => Side::Sell,
        }
    }

    /// Price mechanism.
    #[must_use]
    pub const fn kind(self) -> PendingKind {
        match self {
            Self::BuyLimit | Self::SellLimit => PendingKind::Limit,
            Self::BuyStop | Self::SellStop => PendingKind::Stop,
            Self::BuyStopLimit | Self::SellStopLimit => PendingKind::StopLimit,
        }
    }
}

impl fmt::Display for PendingOrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BuyLimit => "BUY_LIMIT",
            Self::SellLimit => "SELL_LIMIT",
            Self::BuyStop => "BUY_STOP",
            Self::SellStop => "SELL_STOP",
            Self::BuyStopLimit => "BUY_STOP_LIMIT",
            Self::SellStopLimit => "SELL_STOP_LIMIT",
        };
        write!(f, "{name}")
    }
}

/// How long a pending order stays on the book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInForce {
    /// Good til cancelled.
    #[default]
    Gtc,
    /// Expires at the end of the trading day.
    Day,
    /// Good til an explicit expiry.
    Gtd,
}

/// Caller-supplied pending order, before validation.
///
/// Every price field is optional here; which ones must be present depends on
/// `order_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrderDraft {
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Order type.
    pub order_type: PendingOrderType,
    /// Volume in lots.
    pub volume: Decimal,
    /// Entry price for limit and stop orders.
    pub price: Option<Decimal>,
    /// Trigger price for stop-limit orders.
    pub stop_trigger: Option<Decimal>,
    /// Limit price placed once a stop-limit triggers.
    pub limit_price: Option<Decimal>,
    /// Stop-loss price.
    pub stop_loss: Option<Decimal>,
    /// Take-profit price.
    pub take_profit: Option<Decimal>,
    /// Time in force.
    #[serde(default)]
    pub time_in_force: TimeInForce,
    /// Expiry, required with GTD and only with GTD.
    pub expiry: Option<DateTime<Utc>>,
    /// Free-form order comment.
    pub comment: Option<String>,
}

impl PendingOrderDraft {
    /// Draft for a limit or stop order at `price`, GTC.
    #[must_use]
    pub fn at_price(
        symbol: impl Into<Symbol>,
        order_type: PendingOrderType,
        volume: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            order_type,
            volume,
            price: Some(price),
            stop_trigger: None,
            limit_price: None,
            stop_loss: None,
            take_profit: None,
            time_in_force: TimeInForce::Gtc,
            expiry: None,
            comment: None,
        }
    }

    /// Draft for a stop-limit order, GTC.
    #[must_use]
    pub fn stop_limit(
        symbol: impl Into<Symbol>,
        order_type: PendingOrderType,
        volume: Decimal,
        stop_trigger: Decimal,
        limit_price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            order_type,
            volume,
            price: None,
            stop_trigger: Some(stop_trigger),
            limit_price: Some(limit_price),
            stop_loss: None,
            take_profit: None,
            time_in_force: TimeInForce::Gtc,
            expiry: None,
            comment: None,
        }
    }

    /// Set stop-loss and take-profit prices.
    #[must_use]
    pub const fn with_stops(mut self, stop_loss: Option<Decimal>, take_profit: Option<Decimal>) -> Self {
        self.stop_loss = stop_loss;
        self.take_profit = take_profit;
        self
    }

    /// Make the order good til `expiry`.
    #[must_use]
    pub const fn good_till(mut self, expiry: DateTime<Utc>) -> Self {
        self.time_in_force = TimeInForce::Gtd;
        self.expiry = Some(expiry);
        self
    }

    /// Set the time in force without touching the expiry.
    #[must_use]
    pub const fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    /// Attach an order comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Validated price fields of a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingPrice {
    /// Limit order.
    Limit {
        /// Limit price.
        price: Decimal,
    },
    /// Stop order.
    Stop {
        /// Stop price.
        price: Decimal,
    },
    /// Stop-limit order.
    StopLimit {
        /// Trigger price.
        stop_trigger: Decimal,
        /// Limit price placed on trigger.
        limit_price: Decimal,
    },
}

impl PendingPrice {
    /// Price mechanism of this variant.
    #[must_use]
    pub const fn kind(&self) -> PendingKind {
        match self {
            Self::Limit { .. } => PendingKind::Limit,
            Self::Stop { .. } => PendingKind::Stop,
            Self::StopLimit { .. } => PendingKind::StopLimit,
        }
    }

    /// Apply `f` to every price in the variant.
    #[must_use]
    pub fn map(self, f: impl Fn(Decimal) -> Decimal) -> Self {
        match self {
            Self::Limit { price } => Self::Limit { price: f(price) },
            Self::Stop { price } => Self::Stop { price: f(price) },
            Self::StopLimit {
                stop_trigger,
                limit_price,
            } => Self::StopLimit {
                stop_trigger: f(stop_trigger),
                limit_price: f(limit_price),
            },
        }
    }
}

/// Validated time in force.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiration {
    /// Good til cancelled.
    #[default]
    Gtc,
    /// End of the trading day.
    Day,
    /// Good til the given UTC instant.
    Gtd(DateTime<Utc>),
}

/// A pending order that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrderSpec {
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Side of the position the order opens.
    pub side: Side,
    /// Price fields for the order's kind.
    pub price: PendingPrice,
    /// Volume in lots.
    pub volume: Decimal,
    /// Stop-loss price.
    pub stop_loss: Option<Decimal>,
    /// Take-profit price.
    pub take_profit: Option<Decimal>,
    /// Validated time in force.
    pub expiration: Expiration,
    /// Free-form order comment.
    pub comment: Option<String>,
}

impl PendingOrderSpec {
    /// Order type this order was validated as.
    #[must_use]
    pub const fn order_type(&self) -> PendingOrderType {
        PendingOrderType::from_parts(self.side, self.price.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn order_type_round_trips_through_parts() {
        for order_type in [
            PendingOrderType::BuyLimit,
            PendingOrderType::SellLimit,
            PendingOrderType::BuyStop,
            PendingOrderType::SellStop,
            PendingOrderType::BuyStopLimit,
            PendingOrderType::SellStopLimit,
        ] {
            assert_eq!(
                PendingOrderType::from_parts(order_type.side(), order_type.kind()),
                order_type
            );
        }
    }

    #[test]
    fn price_map_touches_every_field() {
        let price = PendingPrice::StopLimit {
            stop_trigger: dec!(1.5),
            limit_price: dec!(1.4),
        };
        assert_eq!(
            price.map(|p| p * dec!(2)),
            PendingPrice::StopLimit {
                stop_trigger: dec!(3.0),
                limit_price: dec!(2.8),
            }
        );
    }

    #[test]
    fn display_uses_terminal_names() {
        assert_eq!(PendingOrderType::SellStopLimit.to_string(), "SELL_STOP_LIMIT");
    }
}
