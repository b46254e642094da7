//! In-memory paper trading gateway.
//!
//! Simulates a trade server well enough to drive the use cases and the
//! trailing engine without a terminal: symbols, quotes, positions and
//! pending orders live in memory, and failures can be scripted per call.

use std::collections::{BTreeMap, HashMap, VecDeque};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::application::ports::{
    GatewayError, MarketOrderRequest, Position, RetCode, TradeResult, TradingGatewayPort,
};
use crate::domain::pending::PendingOrderSpec;
use crate::domain::shared::{PriceQuote, Side, Symbol, Ticket};
use crate::domain::symbol::{SymbolConstraints, is_on_step};

/// Gateway operation, used to script failures and count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaperCall {
    /// `get_symbol_constraints`
    SymbolConstraints,
    /// `get_current_price`
    CurrentPrice,
    /// `send_market_order`
    MarketOrder,
    /// `send_pending_order`
    PendingOrder,
    /// `modify_position_sl_tp`
    ModifyPosition,
    /// `close_position_partial`
    ClosePartial,
    /// `get_open_positions`
    OpenPositions,
    /// `cancel_pending_order`
    CancelPending,
}

#[derive(Debug, Default)]
struct PaperState {
    symbols: HashMap<Symbol, SymbolConstraints>,
    quotes: HashMap<Symbol, (Decimal, Decimal)>,
    positions: BTreeMap<Ticket, Position>,
    pending: BTreeMap<Ticket, PendingOrderSpec>,
    next_ticket: u64,
    scripted: HashMap<PaperCall, VecDeque<GatewayError>>,
    calls: HashMap<PaperCall, u32>,
    stop_loss_history: HashMap<Ticket, Vec<Decimal>>,
}

impl PaperState {
    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket::new(self.next_ticket)
    }

    fn quote(&self, symbol: &Symbol) -> Option<PriceQuote> {
        self.quotes
            .get(symbol)
            .map(|&(bid, ask)| PriceQuote::new(symbol.clone(), bid, ask))
    }

    fn floating_profit(&self, position: &Position) -> Decimal {
        let (Some(quote), Some(constraints)) =
            (self.quote(&position.symbol), self.symbols.get(&position.symbol))
        else {
            return Decimal::ZERO;
        };
        let exit = quote.exit_price(position.side);
        let ticks = position.side.sign() * (exit - position.entry_price) / constraints.tick_size;
        ticks * constraints.tick_value * position.volume
    }

    fn check_volume(&self, symbol: &Symbol, volume: Decimal) -> Result<(), GatewayError> {
        let constraints = self
            .symbols
            .get(symbol)
            .ok_or_else(|| GatewayError::NotFound(format!("symbol {symbol}")))?;
        let in_range = volume >= constraints.volume_min && volume <= constraints.volume_max;
        if in_range && is_on_step(volume, constraints.volume_step) {
            Ok(())
        } else {
            Err(rejected(RetCode::INVALID_VOLUME, format!("Invalid volume {volume}")))
        }
    }
}

fn rejected(ret_code: RetCode, description: impl Into<String>) -> GatewayError {
    GatewayError::Rejected {
        ret_code,
        description: description.into(),
    }
}

fn position_closed(ticket: Ticket) -> GatewayError {
    rejected(RetCode::POSITION_CLOSED, format!("Position {ticket} already closed"))
}

/// In-memory trading gateway.
#[derive(Debug, Default)]
pub struct PaperGateway {
    state: Mutex<PaperState>,
}

impl PaperGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tradable symbol.
    #[must_use]
    pub fn with_symbol(self, constraints: SymbolConstraints, bid: Decimal, ask: Decimal) -> Self {
        self.add_symbol(constraints, bid, ask);
        self
    }

    /// Register or replace a tradable symbol.
    pub fn add_symbol(&self, constraints: SymbolConstraints, bid: Decimal, ask: Decimal) {
        let mut state = self.state.lock();
        state.quotes.insert(constraints.symbol.clone(), (bid, ask));
        state.symbols.insert(constraints.symbol.clone(), constraints);
    }

    /// Move the market for `symbol`.
    pub fn set_quote(&self, symbol: &Symbol, bid: Decimal, ask: Decimal) {
        self.state.lock().quotes.insert(symbol.clone(), (bid, ask));
    }

    /// Open a position directly at the current entry price, bypassing scripting.
    ///
    /// Returns `None` if the symbol has no quote.
    pub fn seed_position(
        &self,
        symbol: &Symbol,
        side: Side,
        volume: Decimal,
        stop_loss: Option<Decimal>,
    ) -> Option<Ticket> {
        let mut state = self.state.lock();
        let entry_price = state.quote(symbol)?.entry_price(side);
        let ticket = state.issue_ticket();
        state.positions.insert(
            ticket,
            Position {
                ticket,
                symbol: symbol.clone(),
                side,
                volume,
                entry_price,
                current_profit: Decimal::ZERO,
                stop_loss,
                take_profit: None,
            },
        );
        Some(ticket)
    }

    /// Close a position from the server side (stop hit, manual close).
    pub fn remove_position(&self, ticket: Ticket) -> Option<Position> {
        self.state.lock().positions.remove(&ticket)
    }

    /// Snapshot of an open position.
    #[must_use]
    pub fn position(&self, ticket: Ticket) -> Option<Position> {
        self.state.lock().positions.get(&ticket).cloned()
    }

    /// Snapshot of a pending order.
    #[must_use]
    pub fn pending_order(&self, ticket: Ticket) -> Option<PendingOrderSpec> {
        self.state.lock().pending.get(&ticket).cloned()
    }

    /// Make the next call of `call` fail with `error`. Queued errors are
    /// consumed in order.
    pub fn fail_next(&self, call: PaperCall, error: GatewayError) {
        self.fail_times(call, 1, &error);
    }

    /// Make the next `times` calls of `call` fail with `error`.
    pub fn fail_times(&self, call: PaperCall, times: usize, error: &GatewayError) {
        let mut state = self.state.lock();
        let queue = state.scripted.entry(call).or_default();
        queue.extend(std::iter::repeat_n(error.clone(), times));
    }

    /// Number of times `call` was invoked, including scripted failures.
    #[must_use]
    pub fn call_count(&self, call: PaperCall) -> u32 {
        self.state.lock().calls.get(&call).copied().unwrap_or(0)
    }

    /// Stop-loss values accepted for `ticket`, in order.
    #[must_use]
    pub fn stop_loss_history(&self, ticket: Ticket) -> Vec<Decimal> {
        self.state
            .lock()
            .stop_loss_history
            .get(&ticket)
            .cloned()
            .unwrap_or_default()
    }

    /// Count the call and pop a scripted failure, if any.
    fn enter(&self, call: PaperCall) -> Result<parking_lot::MutexGuard<'_, PaperState>, GatewayError> {
        let mut state = self.state.lock();
        *state.calls.entry(call).or_insert(0) += 1;
        match state.scripted.get_mut(&call).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl TradingGatewayPort for PaperGateway {
    async fn get_symbol_constraints(
        &self,
        symbol: &Symbol,
    ) -> Result<SymbolConstraints, GatewayError> {
        let state = self.enter(PaperCall::SymbolConstraints)?;
        state
            .symbols
            .get(symbol)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("symbol {symbol}")))
    }

    async fn get_current_price(&self, symbol: &Symbol) -> Result<PriceQuote, GatewayError> {
        let state = self.enter(PaperCall::CurrentPrice)?;
        state
            .quote(symbol)
            .ok_or_else(|| GatewayError::NotFound(format!("symbol {symbol}")))
    }

    async fn send_market_order(
        &self,
        request: MarketOrderRequest,
    ) -> Result<TradeResult, GatewayError> {
        let mut state = self.enter(PaperCall::MarketOrder)?;
        state.check_volume(&request.symbol, request.volume)?;
        let quote = state
            .quote(&request.symbol)
            .ok_or_else(|| rejected(RetCode::PRICE_OFF, "No quotes"))?;

        let entry_price = quote.entry_price(request.side);
        let ticket = state.issue_ticket();
        state.positions.insert(
            ticket,
            Position {
                ticket,
                symbol: request.symbol,
                side: request.side,
                volume: request.volume,
                entry_price,
                current_profit: Decimal::ZERO,
                stop_loss: request.stop_loss,
                take_profit: request.take_profit,
            },
        );

        Ok(TradeResult::done(ticket, Some(entry_price)))
    }

    async fn send_pending_order(
        &self,
        order: PendingOrderSpec,
    ) -> Result<TradeResult, GatewayError> {
        let mut state = self.enter(PaperCall::PendingOrder)?;
        state.check_volume(&order.symbol, order.volume)?;

        let ticket = state.issue_ticket();
        state.pending.insert(ticket, order);

        Ok(TradeResult {
            ticket,
            ret_code: RetCode::PLACED,
            description: "Order placed".to_string(),
            execution_price: None,
        })
    }

    async fn modify_position_sl_tp(
        &self,
        ticket: Ticket,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> Result<TradeResult, GatewayError> {
        let mut state = self.enter(PaperCall::ModifyPosition)?;
        let position = state
            .positions
            .get_mut(&ticket)
            .ok_or_else(|| position_closed(ticket))?;

        position.stop_loss = stop_loss;
        position.take_profit = take_profit;
        if let Some(sl) = stop_loss {
            state.stop_loss_history.entry(ticket).or_default().push(sl);
        }

        Ok(TradeResult::done(ticket, None))
    }

    async fn close_position_partial(
        &self,
        ticket: Ticket,
        volume: Decimal,
        _deviation_points: u32,
    ) -> Result<TradeResult, GatewayError> {
        let mut state = self.enter(PaperCall::ClosePartial)?;
        let position = state
            .positions
            .get(&ticket)
            .cloned()
            .ok_or_else(|| position_closed(ticket))?;
        if volume > position.volume {
            return Err(rejected(
                RetCode::INVALID_VOLUME,
                format!("Close volume {volume} exceeds position volume {}", position.volume),
            ));
        }
        state.check_volume(&position.symbol, volume)?;

        let exit_price = state
            .quote(&position.symbol)
            .map(|q| q.exit_price(position.side));
        let remaining = position.volume - volume;
        if remaining.is_zero() {
            state.positions.remove(&ticket);
        } else if let Some(open) = state.positions.get_mut(&ticket) {
            open.volume = remaining;
        }

        Ok(TradeResult::done(ticket, exit_price))
    }

    async fn get_open_positions(&self) -> Result<Vec<Position>, GatewayError> {
        let state = self.enter(PaperCall::OpenPositions)?;
        Ok(state
            .positions
            .values()
            .map(|p| Position {
                current_profit: state.floating_profit(p),
                ..p.clone()
            })
            .collect())
    }

    async fn cancel_pending_order(&self, ticket: Ticket) -> Result<TradeResult, GatewayError> {
        let mut state = self.enter(PaperCall::CancelPending)?;
        state
            .pending
            .remove(&ticket)
            .ok_or_else(|| GatewayError::NotFound(format!("order {ticket}")))?;

        Ok(TradeResult {
            ticket,
            ret_code: RetCode::DONE,
            description: format!("Order cancelled at {}", Utc::now().format("%H:%M:%S")),
            execution_price: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use rust_decimal_macros::dec;

    fn eurusd() -> SymbolConstraints {
        SymbolConstraints {
            symbol: Symbol::new("EURUSD"),
            point: dec!(0.00001),
            digits: 5,
            volume_min: dec!(0.01),
            volume_step: dec!(0.01),
            volume_max: dec!(100),
            tick_value: dec!(1),
            tick_size: dec!(0.00001),
        }
    }

    fn gateway() -> PaperGateway {
        PaperGateway::new().with_symbol(eurusd(), dec!(1.10000), dec!(1.10010))
    }

    fn market(volume: Decimal) -> MarketOrderRequest {
        MarketOrderRequest {
            symbol: Symbol::new("EURUSD"),
            side: Side::Buy,
            volume,
            stop_loss: None,
            take_profit: None,
            deviation_points: 10,
            comment: None,
        }
    }

    #[tokio::test]
    async fn market_order_opens_position_at_ask() {
        let gateway = gateway();

        let result = gateway
            .send_market_order(market(dec!(0.1)))
            .await
            .expect("should fill");

        assert_eq!(result.execution_price, Some(dec!(1.10010)));
        let position = gateway.position(result.ticket).expect("should be open");
        assert_eq!(position.volume, dec!(0.1));
    }

    #[tokio::test]
    async fn off_grid_volume_is_rejected() {
        let gateway = gateway();

        let err = gateway
            .send_market_order(market(dec!(0.015)))
            .await
            .expect_err("should reject");

        assert_eq!(err.kind(), FailureKind::Business);
    }

    #[tokio::test]
    async fn scripted_failures_are_consumed_in_order() {
        let gateway = gateway();
        gateway.fail_next(
            PaperCall::MarketOrder,
            GatewayError::Transport("reset".to_string()),
        );

        assert!(gateway.send_market_order(market(dec!(0.1))).await.is_err());
        assert!(gateway.send_market_order(market(dec!(0.1))).await.is_ok());
        assert_eq!(gateway.call_count(PaperCall::MarketOrder), 2);
    }

    #[tokio::test]
    async fn floating_profit_follows_quote() {
        let gateway = gateway();
        let symbol = Symbol::new("EURUSD");
        let ticket = gateway
            .seed_position(&symbol, Side::Buy, dec!(1), None)
            .expect("should open");

        gateway.set_quote(&symbol, dec!(1.10110), dec!(1.10120));
        let positions = gateway.get_open_positions().await.expect("should list");

        let position = positions.iter().find(|p| p.ticket == ticket).expect("listed");
        assert_eq!(position.current_profit, dec!(100));
    }

    #[tokio::test]
    async fn closing_everything_removes_position() {
        let gateway = gateway();
        let symbol = Symbol::new("EURUSD");
        let ticket = gateway
            .seed_position(&symbol, Side::Sell, dec!(0.05), None)
            .expect("should open");

        gateway
            .close_position_partial(ticket, dec!(0.05), 10)
            .await
            .expect("should close");

        assert!(gateway.position(ticket).is_none());
        let err = gateway
            .modify_position_sl_tp(ticket, Some(dec!(1.2)), None)
            .await
            .expect_err("position is gone");
        assert_eq!(err.kind(), FailureKind::NotFound);
    }
}
