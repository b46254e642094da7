//! Application Ports (Driven)
//!
//! Ports define how the application reaches external systems. The only
//! driven port is the trading gateway.

mod gateway_port;
mod retcode;

#[cfg(test)]
pub use gateway_port::MockTradingGatewayPort;
pub use gateway_port::{
    GatewayError, MarketOrderRequest, Position, TradeResult, TradingGatewayPort,
};
pub use retcode::RetCode;
