// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Trade Guard - Resilient Order & Risk-Management Layer
//!
//! Sits between a trading application and a remote trading terminal's RPC
//! surface. Every order-mutating call is sized, normalized, validated and
//! retried here before it reaches the broker.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure trading rules, no I/O
//!   - `symbol`: Constraints snapshot, price/volume grid normalization
//!   - `sizing`: Money-risk to lot volume, order plans
//!   - `pending`: Pending order validation and offset pricing
//!   - `partial_close`: Effective close volume for partial closes
//!   - `trailing`: Trailing stop-loss policy (classic, chandelier)
//!
//! - **Application**: Orchestration against the gateway
//!   - `ports`: `TradingGatewayPort`, terminal return codes
//!   - `services`: `RetryExecutor`, `SymbolConstraintsProvider`, `TrailingStopEngine`
//!   - `use_cases`: Market orders, pending orders, partial close, SL/TP amendment
//!
//! - **Infrastructure**: Adapters
//!   - `gateway`: In-memory `PaperGateway`
//!
//! Cross-cutting: [`error::Failure`] at the application boundary, YAML
//! [`config`], `metrics` recorders in [`observability`], and
//! [`telemetry`] subscriber setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Trading rules with no external dependencies.
pub mod domain;

/// Application layer - Use cases, services and port definitions.
pub mod application;

/// Infrastructure layer - Gateway adapters.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

pub mod config;
pub mod error;
pub mod observability;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::partial_close::{CloseAmount, PartialCloseCalculator, PartialCloseRequest};
pub use domain::pending::{PendingOrderDraft, PendingOrderSpec, PendingOrderType, PendingOrderValidator};
pub use domain::shared::{PriceQuote, Side, Symbol, Ticket};
pub use domain::sizing::{MinimumLotPolicy, OrderPlan, RiskRequest, RiskSizer};
pub use domain::symbol::SymbolConstraints;
pub use domain::trailing::{TrailMode, TrailParams};

// Application re-exports
pub use application::ports::{GatewayError, RetCode, TradingGatewayPort};
pub use application::services::{
    RetryExecutor, RetryPolicy, SymbolConstraintsProvider, TrailExit, TrailingConfig,
    TrailingStopEngine,
};
pub use application::use_cases::{
    AmendPositionUseCase, ClosePartialUseCase, OrderSettings, SubmitMarketOrderUseCase,
    SubmitPendingOrderUseCase,
};

// Infrastructure re-exports
pub use infrastructure::gateway::PaperGateway;

pub use error::{Failure, FailureKind};
