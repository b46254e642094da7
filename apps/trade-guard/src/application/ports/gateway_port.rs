//! Trading Gateway Port (Driven Port)
//!
//! Interface to the remote trading terminal: order placement, position
//! queries and symbol metadata. Implementations translate their transport's
//! errors into [`GatewayError`] at the boundary.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::retcode::RetCode;
use crate::domain::pending::PendingOrderSpec;
use crate::domain::shared::{PositionSide, PriceQuote, Side, Symbol, Ticket};
use crate::domain::symbol::SymbolConstraints;
use crate::error::FailureKind;

/// Request to open a position at market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrderRequest {
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Order side.
    pub side: Side,
    /// Volume in lots, on the symbol's grid.
    pub volume: Decimal,
    /// Stop-loss price.
    pub stop_loss: Option<Decimal>,
    /// Take-profit price.
    pub take_profit: Option<Decimal>,
    /// Maximum slippage, in points.
    pub deviation_points: u32,
    /// Free-form order comment.
    pub comment: Option<String>,
}

/// Outcome of a trade request, as reported by the trade server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeResult {
    /// Order, deal or position ticket the request produced or touched.
    pub ticket: Ticket,
    /// Server return code.
    pub ret_code: RetCode,
    /// Server description of the return code.
    pub description: String,
    /// Execution price, for filled market orders.
    pub execution_price: Option<Decimal>,
}

impl TradeResult {
    /// Successful result with code `DONE`.
    #[must_use]
    pub fn done(ticket: Ticket, execution_price: Option<Decimal>) -> Self {
        Self {
            ticket,
            ret_code: RetCode::DONE,
            description: "Request completed".to_string(),
            execution_price,
        }
    }

    /// Convert a non-success return code into [`GatewayError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns the rejection if the return code is not a success code.
    pub fn into_accepted(self) -> Result<Self, GatewayError> {
        if self.ret_code.is_success() {
            Ok(self)
        } else {
            Err(GatewayError::Rejected {
                ret_code: self.ret_code,
                description: self.description,
            })
        }
    }
}

/// An open position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Position ticket.
    pub ticket: Ticket,
    /// Position symbol.
    pub symbol: Symbol,
    /// Long (`Buy`) or short (`Sell`).
    pub side: PositionSide,
    /// Open volume in lots.
    pub volume: Decimal,
    /// Average entry price.
    pub entry_price: Decimal,
    /// Floating profit in account currency.
    pub current_profit: Decimal,
    /// Server-side stop-loss, if set.
    pub stop_loss: Option<Decimal>,
    /// Server-side take-profit, if set.
    pub take_profit: Option<Decimal>,
}

/// Gateway port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Gateway unreachable or the call failed in transit.
    #[error("Gateway transport error: {0}")]
    Transport(String),

    /// Trade server answered with a non-success return code.
    #[error("Request rejected: {ret_code}: {description}")]
    Rejected {
        /// Server return code.
        ret_code: RetCode,
        /// Server description.
        description: String,
    },

    /// Ticket or symbol not known to the server.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The gateway answered with data that cannot be used.
    #[error("Malformed gateway response: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// Failure class of this error.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transient,
            Self::Rejected { ret_code, .. } => ret_code.failure_kind(),
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Malformed(_) => FailureKind::Business,
        }
    }
}

/// Port for the remote trading terminal.
///
/// Only the mutating calls are retried by callers; reads are single-shot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradingGatewayPort: Send + Sync {
    /// Fetch trading constraints for a symbol.
    async fn get_symbol_constraints(&self, symbol: &Symbol)
    -> Result<SymbolConstraints, GatewayError>;

    /// Fetch the current bid/ask.
    async fn get_current_price(&self, symbol: &Symbol) -> Result<PriceQuote, GatewayError>;

    /// Send a market order.
    async fn send_market_order(
        &self,
        request: MarketOrderRequest,
    ) -> Result<TradeResult, GatewayError>;

    /// Place a validated pending order.
    async fn send_pending_order(&self, order: PendingOrderSpec)
    -> Result<TradeResult, GatewayError>;

    /// Set stop-loss and take-profit of an open position.
    async fn modify_position_sl_tp(
        &self,
        ticket: Ticket,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> Result<TradeResult, GatewayError>;

    /// Close `volume` lots of an open position.
    async fn close_position_partial(
        &self,
        ticket: Ticket,
        volume: Decimal,
        deviation_points: u32,
    ) -> Result<TradeResult, GatewayError>;

    /// List open positions.
    async fn get_open_positions(&self) -> Result<Vec<Position>, GatewayError>;

    /// Delete a pending order.
    async fn cancel_pending_order(&self, ticket: Ticket) -> Result<TradeResult, GatewayError>;
}
