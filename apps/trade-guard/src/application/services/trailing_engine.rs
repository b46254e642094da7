//! Trailing Stop Engine
//!
//! Maintains a local trailing stop-loss for open positions. Each trailed
//! ticket gets exactly one polling task that:
//!
//! 1. Checks the position still exists (exits with `PositionGone` if not)
//! 2. Reads the exit price (bid for longs, ask for shorts)
//! 3. Asks the session's [`TrailState`] for an improved stop-loss
//! 4. Applies it through the [`RetryExecutor`]
//!
//! A failed update is logged and the loop continues on the next tick. The
//! registry of sessions is injected state owned by the engine, never global.
//!
//! # Lifecycle
//!
//! `start` and `stop` are serialized by an async lifecycle lock. Starting a
//! ticket that is already trailed cancels the old loop and waits for it to
//! exit before spawning the new one, so two loops never race on the same
//! position's stop-loss.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::constraints_provider::SymbolConstraintsProvider;
use super::retry_executor::RetryExecutor;
use crate::application::ports::{Position, TradingGatewayPort};
use crate::domain::shared::Ticket;
use crate::domain::trailing::{TrailParams, TrailState};
use crate::error::{Failure, FailureKind};
use crate::observability::{record_trailing_update, update_trailing_sessions};

/// Configuration for the trailing stop engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingConfig {
    /// Time between price polls.
    pub poll_interval: Duration,
}

impl Default for TrailingConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Why a trailing loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailExit {
    /// Stopped on request.
    Cancelled,
    /// The position was closed or is no longer known to the server.
    PositionGone,
    /// The loop task failed.
    Failed(String),
}

#[derive(Debug)]
struct SessionHandle {
    id: u64,
    cancel: CancellationToken,
    task: JoinHandle<TrailExit>,
}

struct EngineInner<G>
where
    G: TradingGatewayPort,
{
    gateway: Arc<G>,
    constraints: Arc<SymbolConstraintsProvider<G>>,
    retry: RetryExecutor,
    config: TrailingConfig,
    sessions: Mutex<HashMap<Ticket, SessionHandle>>,
    next_id: AtomicU64,
    root: CancellationToken,
}

/// Local trailing stop-loss scheduler.
pub struct TrailingStopEngine<G>
where
    G: TradingGatewayPort + 'static,
{
    inner: Arc<EngineInner<G>>,
    lifecycle: tokio::sync::Mutex<()>,
}

impl<G> TrailingStopEngine<G>
where
    G: TradingGatewayPort + 'static,
{
    /// Create an engine with no active sessions.
    #[must_use]
    pub fn new(
        gateway: Arc<G>,
        constraints: Arc<SymbolConstraintsProvider<G>>,
        retry: RetryExecutor,
        config: TrailingConfig,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                gateway,
                constraints,
                retry,
                config,
                sessions: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                root: CancellationToken::new(),
            }),
            lifecycle: tokio::sync::Mutex::new(()),
        }
    }

    /// Start trailing a position, replacing any session already running for
    /// the ticket.
    ///
    /// The session is seeded with the position's current server-side
    /// stop-loss, so an existing tighter stop is never loosened.
    ///
    /// # Errors
    ///
    /// Returns a failure if the parameters are invalid, the position is not
    /// open, or it does not match the requested symbol and side.
    pub async fn start(&self, params: TrailParams) -> Result<(), Failure> {
        params.validate()?;
        let _lifecycle = self.lifecycle.lock().await;

        if let Some(previous) = self.inner.take_session(params.ticket) {
            tracing::info!(ticket = %params.ticket, "Replacing existing trailing session");
            let exit = finish(previous).await;
            tracing::debug!(ticket = %params.ticket, exit = ?exit, "Previous session exited");
        }

        let position = self.inner.find_position(params.ticket).await?.ok_or_else(|| {
            Failure::not_found(format!("position {} is not open", params.ticket))
        })?;
        if position.symbol != params.symbol || position.side != params.side {
            return Err(Failure::validation(format!(
                "position {} is {} {}, not {} {}",
                params.ticket, position.side, position.symbol, params.side, params.symbol
            )));
        }
        self.inner.constraints.get(&params.symbol).await?;

        let state = TrailState::new(&params, position.stop_loss);
        self.inner.spawn_session(params, state);
        Ok(())
    }

    /// Stop trailing `ticket` and wait for its loop to exit.
    ///
    /// Returns how the loop ended, or `None` if no session was active.
    pub async fn stop(&self, ticket: Ticket) -> Option<TrailExit> {
        let _lifecycle = self.lifecycle.lock().await;

        let handle = self.inner.take_session(ticket)?;
        let exit = finish(handle).await;
        tracing::info!(ticket = %ticket, exit = ?exit, "Trailing stopped");
        Some(exit)
    }

    /// Returns true if a session is running for `ticket`.
    #[must_use]
    pub fn is_active(&self, ticket: Ticket) -> bool {
        self.inner.sessions.lock().contains_key(&ticket)
    }

    /// Tickets with a running session, in ascending order.
    #[must_use]
    pub fn active_tickets(&self) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self.inner.sessions.lock().keys().copied().collect();
        tickets.sort_unstable();
        tickets
    }

    /// Stop every session and wait for all loops to exit.
    pub async fn shutdown(&self) {
        let _lifecycle = self.lifecycle.lock().await;

        let handles: Vec<(Ticket, SessionHandle)> = {
            let mut sessions = self.inner.sessions.lock();
            let drained = sessions.drain().collect();
            update_trailing_sessions(sessions.len());
            drained
        };
        for (_, handle) in &handles {
            handle.cancel.cancel();
        }
        for (ticket, handle) in handles {
            let exit = finish(handle).await;
            tracing::debug!(ticket = %ticket, exit = ?exit, "Trailing session shut down");
        }
        tracing::info!("Trailing engine shut down");
    }
}

impl<G> Drop for TrailingStopEngine<G>
where
    G: TradingGatewayPort + 'static,
{
    fn drop(&mut self) {
        self.inner.root.cancel();
    }
}

/// Cancel a session and wait for its loop.
async fn finish(handle: SessionHandle) -> TrailExit {
    handle.cancel.cancel();
    match handle.task.await {
        Ok(exit) => exit,
        Err(e) => TrailExit::Failed(e.to_string()),
    }
}

impl<G> EngineInner<G>
where
    G: TradingGatewayPort + 'static,
{
    fn take_session(&self, ticket: Ticket) -> Option<SessionHandle> {
        let mut sessions = self.sessions.lock();
        let handle = sessions.remove(&ticket);
        update_trailing_sessions(sessions.len());
        handle
    }

    fn spawn_session(self: &Arc<Self>, params: TrailParams, state: TrailState) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = self.root.child_token();
        let ticket = params.ticket;

        tracing::info!(
            ticket = %ticket,
            symbol = %params.symbol,
            side = %params.side,
            distance_points = %params.distance_points,
            step_points = %params.step_points,
            mode = ?params.mode,
            seed_stop_loss = ?state.last_applied(),
            "Trailing started"
        );

        // Insert under the lock so a loop that exits immediately cannot try to
        // deregister before it is registered.
        let mut sessions = self.sessions.lock();
        let inner = Arc::clone(self);
        let loop_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            let exit = inner.run(params, state, loop_cancel).await;
            inner.deregister(ticket, id);
            tracing::info!(ticket = %ticket, exit = ?exit, "Trailing loop exited");
            exit
        });
        sessions.insert(ticket, SessionHandle { id, cancel, task });
        update_trailing_sessions(sessions.len());
    }

    fn deregister(&self, ticket: Ticket, id: u64) {
        let mut sessions = self.sessions.lock();
        if sessions.get(&ticket).is_some_and(|handle| handle.id == id) {
            sessions.remove(&ticket);
        }
        update_trailing_sessions(sessions.len());
    }

    async fn find_position(&self, ticket: Ticket) -> Result<Option<Position>, Failure> {
        let positions = self.gateway.get_open_positions().await?;
        Ok(positions.into_iter().find(|p| p.ticket == ticket))
    }

    async fn run(
        &self,
        params: TrailParams,
        mut state: TrailState,
        cancel: CancellationToken,
    ) -> TrailExit {
        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => return TrailExit::Cancelled,
                _ = interval.tick() => {}
            }

            if let Some(exit) = self.tick(&params, &mut state, &cancel).await {
                return exit;
            }
        }
    }

    /// One poll. Returns `Some` when the loop must end.
    async fn tick(
        &self,
        params: &TrailParams,
        state: &mut TrailState,
        cancel: &CancellationToken,
    ) -> Option<TrailExit> {
        let ticket = params.ticket;

        let position = match self.find_position(ticket).await {
            Ok(Some(position)) => position,
            Ok(None) => return Some(TrailExit::PositionGone),
            Err(failure) if failure.is(FailureKind::NotFound) => {
                return Some(TrailExit::PositionGone);
            }
            Err(failure) => {
                tracing::warn!(ticket = %ticket, error = %failure, "Position refresh failed");
                return None;
            }
        };
        if let Some(server_sl) = position.stop_loss {
            state.record_applied(server_sl);
        }

        let constraints = match self.constraints.get(&params.symbol).await {
            Ok(constraints) => constraints,
            Err(failure) => {
                tracing::warn!(ticket = %ticket, error = %failure, "Constraints unavailable");
                return None;
            }
        };
        let quote = match self.gateway.get_current_price(&params.symbol).await {
            Ok(quote) => quote,
            Err(e) => {
                tracing::warn!(ticket = %ticket, error = %e, "Price unavailable");
                return None;
            }
        };

        let reference = quote.exit_price(params.side);
        let Some(stop_loss) = state.evaluate(reference, constraints.point, constraints.digits)
        else {
            tracing::debug!(ticket = %ticket, reference = %reference, "No stop improvement");
            return None;
        };

        let gateway = &self.gateway;
        let take_profit = position.take_profit;
        let result = self
            .retry
            .execute("modify_position_sl_tp", cancel, move || async move {
                gateway
                    .modify_position_sl_tp(ticket, Some(stop_loss), take_profit)
                    .await?
                    .into_accepted()
            })
            .await;

        match result {
            Ok(_) => {
                let previous = state.last_applied();
                state.record_applied(stop_loss);
                record_trailing_update("applied");
                tracing::info!(
                    ticket = %ticket,
                    reference = %reference,
                    previous_stop_loss = ?previous,
                    stop_loss = %stop_loss,
                    "Trailing stop moved"
                );
                None
            }
            Err(failure) => match failure.kind {
                FailureKind::NotFound => Some(TrailExit::PositionGone),
                FailureKind::Cancelled => Some(TrailExit::Cancelled),
                _ => {
                    record_trailing_update("failed");
                    tracing::warn!(
                        ticket = %ticket,
                        stop_loss = %stop_loss,
                        error = %failure,
                        "Trailing stop update failed, will retry next tick"
                    );
                    None
                }
            },
        }
    }
}
