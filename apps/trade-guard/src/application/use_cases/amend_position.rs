//! Amend Position Use Case
//!
//! Stop-loss / take-profit changes and pending order cancellation.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use super::open_position;
use crate::application::ports::{TradeResult, TradingGatewayPort};
use crate::application::services::{RetryExecutor, SymbolConstraintsProvider};
use crate::domain::shared::Ticket;
use crate::domain::symbol::normalize_price;
use crate::error::Failure;

/// Use case for modifying open positions and pending orders.
pub struct AmendPositionUseCase<G>
where
    G: TradingGatewayPort,
{
    gateway: Arc<G>,
    constraints: Arc<SymbolConstraintsProvider<G>>,
    retry: RetryExecutor,
    cancel: CancellationToken,
}

impl<G> AmendPositionUseCase<G>
where
    G: TradingGatewayPort,
{
    /// Create a new `AmendPositionUseCase`.
    pub fn new(
        gateway: Arc<G>,
        constraints: Arc<SymbolConstraintsProvider<G>>,
        retry: RetryExecutor,
    ) -> Self {
        Self {
            gateway,
            constraints,
            retry,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort retry waits when `cancel` fires.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Set stop-loss and take-profit of an open position.
    ///
    /// A stop-loss that would loosen the current one is rejected unless
    /// `force` is set; a forced loosening is logged.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the position is not open, a validation failure
    /// for non-positive prices or an unforced loosening, or the classified
    /// gateway failure.
    pub async fn modify_stops(
        &self,
        ticket: Ticket,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
        force: bool,
    ) -> Result<TradeResult, Failure> {
        for (field, value) in [("stop_loss", stop_loss), ("take_profit", take_profit)] {
            if let Some(price) = value
                && price <= Decimal::ZERO
            {
                return Err(Failure::validation(format!(
                    "{field} must be positive, got {price}"
                )));
            }
        }

        let position = open_position(self.gateway.as_ref(), ticket).await?;
        let constraints = self.constraints.get(&position.symbol).await?;
        let stop_loss = stop_loss.map(|p| normalize_price(p, constraints.digits));
        let take_profit = take_profit.map(|p| normalize_price(p, constraints.digits));

        if let (Some(new_sl), Some(current_sl)) = (stop_loss, position.stop_loss) {
            let loosens = position.side.sign() * (new_sl - current_sl) < Decimal::ZERO;
            if loosens && !force {
                return Err(Failure::validation(format!(
                    "stop-loss {new_sl} loosens current {current_sl} on {} {ticket}",
                    position.side
                )));
            }
            if loosens {
                tracing::warn!(
                    ticket = %ticket,
                    current_stop_loss = %current_sl,
                    stop_loss = %new_sl,
                    "Forced stop-loss loosening"
                );
            }
        }

        let gateway = &self.gateway;
        let result = self
            .retry
            .execute("modify_position_sl_tp", &self.cancel, move || async move {
                gateway
                    .modify_position_sl_tp(ticket, stop_loss, take_profit)
                    .await?
                    .into_accepted()
            })
            .await?;

        tracing::info!(
            ticket = %ticket,
            stop_loss = ?stop_loss,
            take_profit = ?take_profit,
            "Position stops modified"
        );
        Ok(result)
    }

    /// Delete a pending order.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure.
    pub async fn cancel_pending(&self, ticket: Ticket) -> Result<TradeResult, Failure> {
        let gateway = &self.gateway;
        let result = self
            .retry
            .execute("cancel_pending_order", &self.cancel, move || async move {
                gateway.cancel_pending_order(ticket).await?.into_accepted()
            })
            .await?;

        tracing::info!(ticket = %ticket, "Pending order cancelled");
        Ok(result)
    }
}
