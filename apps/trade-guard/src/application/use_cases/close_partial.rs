//! Close Partial Use Case

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use super::open_position;
use super::settings::OrderSettings;
use crate::application::ports::{TradeResult, TradingGatewayPort};
use crate::application::services::{RetryExecutor, SymbolConstraintsProvider};
use crate::domain::partial_close::{PartialCloseCalculator, PartialCloseRequest};
use crate::error::Failure;

/// Result of a partial close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialCloseOutcome {
    /// Gateway result.
    pub trade: TradeResult,
    /// Volume actually closed.
    pub closed_volume: Decimal,
    /// Volume left open.
    pub remaining_volume: Decimal,
}

/// Use case for closing part of a position.
pub struct ClosePartialUseCase<G>
where
    G: TradingGatewayPort,
{
    gateway: Arc<G>,
    constraints: Arc<SymbolConstraintsProvider<G>>,
    retry: RetryExecutor,
    settings: OrderSettings,
    cancel: CancellationToken,
}

impl<G> ClosePartialUseCase<G>
where
    G: TradingGatewayPort,
{
    /// Create a new `ClosePartialUseCase`.
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

    /// Close the resolved volume of the live position.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the position is not open, a validation failure
    /// if the amount cannot be placed on the lot grid, or the classified
    /// gateway failure.
    pub async fn execute(&self, request: PartialCloseRequest) -> Result<PartialCloseOutcome, Failure> {
        let position = open_position(self.gateway.as_ref(), request.ticket).await?;
        let constraints = self.constraints.get(&position.symbol).await?;
        let volume = PartialCloseCalculator::compute(&request, position.volume, &constraints)?;

        let gateway = &self.gateway;
        let ticket = request.ticket;
        let deviation = self.settings.deviation_points;
        let trade = self
            .retry
            .execute("close_position_partial", &self.cancel, move || async move {
                gateway
                    .close_position_partial(ticket, volume, deviation)
                    .await?
                    .into_accepted()
            })
            .await?;

        let remaining_volume = position.volume - volume;
        tracing::info!(
            ticket = %ticket,
            symbol = %position.symbol,
            amount = ?request.amount,
            closed_volume = %volume,
            remaining_volume = %remaining_volume,
            "Position partially closed"
        );

        Ok(PartialCloseOutcome {
            trade,
            closed_volume: volume,
            remaining_volume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{GatewayError, MockTradingGatewayPort, Position};
    use crate::application::services::RetryPolicy;
    use crate::domain::shared::{Side, Symbol, Ticket};
    use crate::domain::symbol::SymbolConstraints;
    use crate::error::FailureKind;
    use rust_decimal_macros::dec;

    fn gateway_with_position(volume: Decimal) -> MockTradingGatewayPort {
        let mut gateway = MockTradingGatewayPort::new();
        gateway.expect_get_open_positions().returning(move || {
            Ok(vec![Position {
                ticket: Ticket::new(5),
                symbol: Symbol::new("XAUUSD"),
                side: Side::Sell,
                volume,
                entry_price: dec!(2400.50),
                current_profit: dec!(-3.2),
                stop_loss: None,
                take_profit: None,
            }])
        });
        gateway.expect_get_symbol_constraints().returning(|s| {
            Ok(SymbolConstraints {
                symbol: s.clone(),
                point: dec!(0.01),
                digits: 2,
                volume_min: dec!(0.1),
                volume_step: dec!(0.1),
                volume_max: dec!(50),
                tick_value: dec!(1),
                tick_size: dec!(0.01),
            })
        });
        gateway
    }

    fn use_case(gateway: MockTradingGatewayPort) -> ClosePartialUseCase<MockTradingGatewayPort> {
        let gateway = Arc::new(gateway);
        let constraints = Arc::new(SymbolConstraintsProvider::new(Arc::clone(&gateway)));
        ClosePartialUseCase::new(
            gateway,
            constraints,
            RetryExecutor::new(RetryPolicy::default()),
            OrderSettings::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_sends_rounded_volume_with_deviation() {
        let mut gateway = gateway_with_position(dec!(1.5));
        gateway
            .expect_close_position_partial()
            .times(1)
            .withf(|ticket, volume, deviation| {
                *ticket == Ticket::new(5) && *volume == dec!(0.4) && *deviation == 10
            })
            .returning(|ticket, _, _| Ok(TradeResult::done(ticket, Some(dec!(2401.10)))));
        let use_case = use_case(gateway);

        // 30% of 1.5 = 0.45, floored to the 0.1 step.
        let outcome = use_case
            .execute(PartialCloseRequest::percent(Ticket::new(5), dec!(30)))
            .await
            .expect("should close");

        assert_eq!(outcome.closed_volume, dec!(0.4));
        assert_eq!(outcome.remaining_volume, dec!(1.1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_retries_transport_errors() {
        let mut gateway = gateway_with_position(dec!(1));
        let mut seq = mockall::Sequence::new();
        gateway
            .expect_close_position_partial()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(GatewayError::Transport("broken pipe".to_string())));
        gateway
            .expect_close_position_partial()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|ticket, _, _| Ok(TradeResult::done(ticket, None)));
        let use_case = use_case(gateway);

        let outcome = use_case
            .execute(PartialCloseRequest::volume(Ticket::new(5), dec!(0.5)))
            .await
            .expect("should close on second attempt");

        assert_eq!(outcome.closed_volume, dec!(0.5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_position_closed_mid_request_is_not_found() {
        let mut gateway = gateway_with_position(dec!(1));
        gateway
            .expect_close_position_partial()
            .times(1)
            .returning(|_, _, _| {
                Err(GatewayError::Rejected {
                    ret_code: crate::application::ports::RetCode::POSITION_CLOSED,
                    description: "Position closed".to_string(),
                })
            });
        let use_case = use_case(gateway);

        let failure = use_case
            .execute(PartialCloseRequest::percent(Ticket::new(5), dec!(100)))
            .await
            .expect_err("should fail");

        assert_eq!(failure.kind, FailureKind::NotFound);
        assert_eq!(failure.attempts, 1);
    }
}
