//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trade_guard::application::services::{RetryExecutor, RetryPolicy, SymbolConstraintsProvider};
use trade_guard::domain::shared::Symbol;
use trade_guard::domain::symbol::SymbolConstraints;
use trade_guard::infrastructure::gateway::PaperGateway;

pub const BID: Decimal = dec!(1.10000);
pub const ASK: Decimal = dec!(1.10010);

pub fn eurusd() -> Symbol {
    Symbol::new("EURUSD")
}

/// Five-digit FX symbol where one point of one lot is worth 1.
pub fn eurusd_constraints() -> SymbolConstraints {
    SymbolConstraints {
        symbol: eurusd(),
        point: dec!(0.00001),
        digits: 5,
        volume_min: dec!(0.01),
        volume_step: dec!(0.01),
        volume_max: dec!(100),
        tick_value: dec!(1),
        tick_size: dec!(0.00001),
    }
}

pub fn paper_gateway() -> Arc<PaperGateway> {
    Arc::new(PaperGateway::new().with_symbol(eurusd_constraints(), BID, ASK))
}

pub fn constraints(gateway: &Arc<PaperGateway>) -> Arc<SymbolConstraintsProvider<PaperGateway>> {
    Arc::new(SymbolConstraintsProvider::new(Arc::clone(gateway)))
}

/// Three attempts, 100ms doubling to a 5s cap.
pub fn retry() -> RetryExecutor {
    RetryExecutor::new(RetryPolicy::new(
        3,
        Duration::from_millis(100),
        Duration::from_secs(5),
    ))
}
