//! Application Use Cases
//!
//! Use cases orchestrate domain logic and the gateway to fulfill one
//! trading command each. Every mutating gateway call goes through the
//! [`RetryExecutor`](crate::application::services::RetryExecutor).

mod amend_position;
mod close_partial;
mod settings;
mod submit_market_order;
mod submit_pending_order;

pub use amend_position::AmendPositionUseCase;
pub use close_partial::{ClosePartialUseCase, PartialCloseOutcome};
pub use settings::OrderSettings;
pub use submit_market_order::SubmitMarketOrderUseCase;
pub use submit_pending_order::SubmitPendingOrderUseCase;

use crate::application::ports::{Position, TradingGatewayPort};
use crate::domain::shared::Ticket;
use crate::error::Failure;

/// Look up a live position by ticket.
async fn open_position<G>(gateway: &G, ticket: Ticket) -> Result<Position, Failure>
where
    G: TradingGatewayPort + ?Sized,
{
    gateway
        .get_open_positions()
        .await?
        .into_iter()
        .find(|p| p.ticket == ticket)
        .ok_or_else(|| Failure::not_found(format!("position {ticket} is not open")))
}
