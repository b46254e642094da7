//! Top-of-book price snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Side, Symbol};

/// Current bid/ask for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Quoted symbol.
    pub symbol: Symbol,
    /// Best bid price.
    pub bid: Decimal,
    /// Best ask price.
    pub ask: Decimal,
    /// Server time of the quote.
    pub timestamp: DateTime<Utc>,
}

impl PriceQuote {
    /// Create a quote stamped with the current time.
    #[must_use]
    pub fn new(symbol: Symbol, bid: Decimal, ask: Decimal) -> Self {
        Self {
            symbol,
            bid,
            ask,
            timestamp: Utc::now(),
        }
    }

    /// Price at which an order on `side` opens: ask for buys, bid for sells.
    #[must_use]
    pub const fn entry_price(&self, side: Side) -> Decimal {
        match side {
            Side::Buy => self.ask,
            Side::Sell => self.bid,
        }
    }

    /// Price at which a position on `side` closes: bid for longs, ask for shorts.
    ///
    /// This is also the trailing reference price.
    #[must_use]
    pub const fn exit_price(&self, side: Side) -> Decimal {
        match side {
            Side::Buy => self.bid,
            Side::Sell => self.ask,
        }
    }

    /// Get the spread.
    #[must_use]
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn entry_and_exit_sides() {
        let q = PriceQuote::new(Symbol::new("EURUSD"), dec!(1.1000), dec!(1.1002));
        assert_eq!(q.entry_price(Side::Buy), dec!(1.1002));
        assert_eq!(q.entry_price(Side::Sell), dec!(1.1000));
        assert_eq!(q.exit_price(Side::Buy), dec!(1.1000));
        assert_eq!(q.exit_price(Side::Sell), dec!(1.1002));
        assert_eq!(q.spread(), dec!(0.0002));
    }
}
