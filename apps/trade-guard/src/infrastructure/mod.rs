//! Infrastructure Layer
//!
//! Adapters implementing the ports defined in the application layer.
//!
//! - `gateway/`: Trading gateway adapters. The in-memory [`PaperGateway`]
//!   simulates a trade server for paper trading and tests; terminal
//!   transports are supplied by the embedding application.
//!
//! [`PaperGateway`]: gateway::PaperGateway

pub mod gateway;
