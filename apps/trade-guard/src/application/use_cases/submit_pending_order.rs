//! Submit Pending Order Use Case

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use super::settings::OrderSettings;
use crate::application::ports::{TradeResult, TradingGatewayPort};
use crate::application::services::{RetryExecutor, SymbolConstraintsProvider};
use crate::domain::pending::{
    PendingOrderDraft, PendingOrderSpec, PendingOrderType, PendingOrderValidator, PendingPrice,
    pending_price_from_offset,
};
use crate::domain::shared::Symbol;
use crate::domain::symbol::{normalize_price, normalize_volume};
use crate::error::Failure;

/// Use case for validated pending orders.
pub struct SubmitPendingOrderUseCase<G>
where
    G: TradingGatewayPort,
{
    gateway: Arc<G>,
    constraints: Arc<SymbolConstraintsProvider<G>>,
    retry: RetryExecutor,
    settings: OrderSettings,
    cancel: CancellationToken,
}

impl<G> SubmitPendingOrderUseCase<G>
where
    G: TradingGatewayPort,
{
    /// Create a new `SubmitPendingOrderUseCase`.
    pub fn new(
        gateway: Arc<G>,
        constraints: Arc<SymbolConstraintsProvider<G>>,
        retry: RetryExecutor,
        settings: OrderSettings,
    ) -> Self {
        Self {
            gateway,
            constraints,
            retry,
            settings,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort retry waits when `cancel` fires.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Validate, normalize and send a pending order.
    ///
    /// # Errors
    ///
    /// Returns a validation failure listing every issue in the draft, or the
    /// classified gateway failure.
    pub async fn submit(&self, draft: PendingOrderDraft) -> Result<TradeResult, Failure> {
        let spec = PendingOrderValidator::validate(&draft, Utc::now())?;
        let spec = self.normalize(spec).await?;

        let gateway = &self.gateway;
        let order = &spec;
        let result = self
            .retry
            .execute("send_pending_order", &self.cancel, move || async move {
                gateway.send_pending_order(order.clone()).await?.into_accepted()
            })
            .await?;

        tracing::info!(
            ticket = %result.ticket,
            symbol = %spec.symbol,
            order_type = %spec.order_type(),
            volume = %spec.volume,
            price = ?spec.price,
            expiration = ?spec.expiration,
            "Pending order placed"
        );
        Ok(result)
    }

    /// Entry price `offset_points` away from the current market for `order_type`.
    ///
    /// # Errors
    ///
    /// Returns a failure if constraints or price cannot be read, or if the
    /// offset is negative.
    pub async fn price_at_offset(
        &self,
        symbol: &Symbol,
        order_type: PendingOrderType,
        offset_points: Decimal,
    ) -> Result<Decimal, Failure> {
        if offset_points < Decimal::ZERO {
            return Err(Failure::validation(format!(
                "offset must not be negative, got {offset_points} points"
            )));
        }
        let constraints = self.constraints.get(symbol).await?;
        let quote = self.gateway.get_current_price(symbol).await?;
        pending_price_from_offset(
            order_type,
            &quote,
            offset_points,
            constraints.point,
            constraints.digits,
        )
        .ok_or_else(|| {
            Failure::validation(format!("offset of {offset_points} points is out of range"))
        })
    }

    /// Put prices on the symbol's digit grid and volume on its lot grid.
    ///
    /// A price that rounds to zero or below at `digits` is rejected.
    async fn normalize(&self, mut spec: PendingOrderSpec) -> Result<PendingOrderSpec, Failure> {
        let constraints = self.constraints.get(&spec.symbol).await?;
        let digits = constraints.digits;

        spec.price = spec.price.map(|p| normalize_price(p, digits));
        spec.stop_loss = spec.stop_loss.map(|p| normalize_price(p, digits));
        spec.take_profit = spec.take_profit.map(|p| normalize_price(p, digits));

        let entry = match spec.price {
            PendingPrice::Limit { price } | PendingPrice::Stop { price } => {
                [("price", Some(price)), ("limit_price", None)]
            }
            PendingPrice::StopLimit {
                stop_trigger,
                limit_price,
            } => [("stop_trigger", Some(stop_trigger)), ("limit_price", Some(limit_price))],
        };
        let stops = [("stop_loss", spec.stop_loss), ("take_profit", spec.take_profit)];
        for (field, value) in entry.into_iter().chain(stops) {
            if let Some(value) = value
                && value <= Decimal::ZERO
            {
                return Err(Failure::validation(format!(
                    "{field} rounds to {value} at {digits} digits"
                )));
            }
        }
        spec.volume = normalize_volume(
            spec.volume,
            constraints.volume_min,
            constraints.volume_step,
            constraints.volume_max,
        )?;
        if spec.comment.is_none() {
            spec.comment.clone_from(&self.settings.comment);
        }
        Ok(spec)
    }
}
