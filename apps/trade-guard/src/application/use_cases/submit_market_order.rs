//! Submit Market Order Use Case
//!
//! Sizes a market order from a money-risk budget and sends it with retry.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::settings::OrderSettings;
use crate::application::ports::{MarketOrderRequest, TradeResult, TradingGatewayPort};
use crate::application::services::{RetryExecutor, SymbolConstraintsProvider};
use crate::domain::sizing::{OrderPlan, RiskRequest, RiskSizer};
use crate::error::Failure;

/// Use case for risk-sized market orders.
pub struct SubmitMarketOrderUseCase<G>
where
    G: TradingGatewayPort,
{
    gateway: Arc<G>,
    constraints: Arc<SymbolConstraintsProvider<G>>,
    retry: RetryExecutor,
    sizer: RiskSizer,
    settings: OrderSettings,
    cancel: CancellationToken,
}

impl<G> SubmitMarketOrderUseCase<G>
where
    G: TradingGatewayPort,
{
    /// Create a new `SubmitMarketOrderUseCase`.
    pub fn new(
        gateway: Arc<G>,
        constraints: Arc<SymbolConstraintsProvider<G>>,
        retry: RetryExecutor,
        sizer: RiskSizer,
        settings: OrderSettings,
    ) -> Self {
        Self {
            gateway,
            constraints,
            retry,
            sizer,
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

    /// Size `request` against live constraints and price it off the current quote.
    ///
    /// # Errors
    ///
    /// Returns a validation failure for bad input or a volume below the
    /// broker minimum, or the gateway failure if constraints or price cannot
    /// be read.
    pub async fn plan(&self, request: &RiskRequest) -> Result<OrderPlan, Failure> {
        let constraints = self.constraints.get(&request.symbol).await?;
        let sized = self.sizer.size(request, &constraints)?;

        if sized.substituted_minimum {
            tracing::warn!(
                symbol = %request.symbol,
                raw_volume = %sized.raw_volume,
                volume = %sized.volume,
                risk_budget = %request.risk_money,
                realized_risk = %sized.realized_risk,
                "Broker minimum substituted, realized risk exceeds budget"
            );
        }

        let quote = self.gateway.get_current_price(&request.symbol).await?;
        Ok(OrderPlan::from_sized(request, &sized, &constraints, &quote)?)
    }

    /// Send a planned order, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the classified failure after retries are exhausted or on the
    /// first non-retryable rejection.
    pub async fn execute(&self, plan: OrderPlan) -> Result<TradeResult, Failure> {
        let request = MarketOrderRequest {
            symbol: plan.symbol,
            side: plan.side,
            volume: plan.volume,
            stop_loss: Some(plan.stop_loss),
            take_profit: plan.take_profit,
            deviation_points: self.settings.deviation_points,
            comment: self.settings.comment.clone(),
        };

        let gateway = &self.gateway;
        let order = &request;
        let result = self
            .retry
            .execute("send_market_order", &self.cancel, move || async move {
                gateway.send_market_order(order.clone()).await?.into_accepted()
            })
            .await?;

        tracing::info!(
            ticket = %result.ticket,
            symbol = %request.symbol,
            side = %request.side,
            volume = %request.volume,
            execution_price = ?result.execution_price,
            stop_loss = ?request.stop_loss,
            take_profit = ?request.take_profit,
            realized_risk = %plan.realized_risk,
            "Market order placed"
        );
        Ok(result)
    }

    /// Plan and send in one step.
    ///
    /// # Errors
    ///
    /// See [`Self::plan`] and [`Self::execute`].
    pub async fn place(&self, request: RiskRequest) -> Result<TradeResult, Failure> {
        let plan = self.plan(&request).await?;
        self.execute(plan).await
    }
}
