//! Entry prices placed a number of points away from the market.

use rust_decimal::Decimal;

use super::types::{PendingKind, PendingOrderType};
use crate::domain::shared::PriceQuote;
use crate::domain::symbol::{normalize_price, points_to_price};

/// Price `offset_points` away from the market on the side the order type
/// waits on.
///
/// Buy orders are measured from the ask, sell orders from the bid. Limits
/// wait for a better price (buy below, sell above); stops and stop-limit
/// triggers wait for a breakout (buy above, sell below). The result is
/// rounded to `digits`. Returns `None` if the offset is too large to price.
#[must_use]
pub fn pending_price_from_offset(
    order_type: PendingOrderType,
    quote: &PriceQuote,
    offset_points: Decimal,
    point: Decimal,
    digits: u32,
) -> Option<Decimal> {
    let side = order_type.side();
    let reference = quote.entry_price(side);
    let offset = points_to_price(offset_points, point)?;

    let toward_profit = match order_type.kind() {
        PendingKind::Limit => -offset,
        PendingKind::Stop | PendingKind::StopLimit => offset,
    };

    let price = reference.checked_add(side.sign() * toward_profit)?;
    Some(normalize_price(price, digits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Symbol;
    use rust_decimal_macros::dec;

    fn quote() -> PriceQuote {
        PriceQuote::new(Symbol::new("EURUSD"), dec!(1.10000), dec!(1.10010))
    }

    #[test]
    fn limits_wait_for_a_better_price() {
        let point = dec!(0.00001);
        assert_eq!(
            pending_price_from_offset(PendingOrderType::BuyLimit, &quote(), dec!(50), point, 5),
            Some(dec!(1.0996))
        );
        assert_eq!(
            pending_price_from_offset(PendingOrderType::SellLimit, &quote(), dec!(50), point, 5),
            Some(dec!(1.1005))
        );
    }

    #[test]
    fn stops_wait_for_a_breakout() {
        let point = dec!(0.00001);
        assert_eq!(
            pending_price_from_offset(PendingOrderType::BuyStop, &quote(), dec!(50), point, 5),
            Some(dec!(1.1006))
        );
        assert_eq!(
            pending_price_from_offset(PendingOrderType::SellStopLimit, &quote(), dec!(50), point, 5),
            Some(dec!(1.0995))
        );
    }

    #[test]
    fn unpriceable_offset_is_none() {
        assert_eq!(
            pending_price_from_offset(PendingOrderType::BuyStop, &quote(), Decimal::MAX, dec!(2), 5),
            None
        );
    }
}
