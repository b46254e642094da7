//! Application Services
//!
//! Application services coordinate domain logic and the gateway port. The
//! retry executor and constraints cache are shared by every use case; the
//! trailing engine runs background tasks.

mod constraints_provider;
mod retry_executor;
mod trailing_engine;

pub use constraints_provider::{DEFAULT_CONSTRAINTS_TTL, SymbolConstraintsProvider};
pub use retry_executor::{BackoffSchedule, RetryExecutor, RetryPolicy};
pub use trailing_engine::{TrailExit, TrailingConfig, TrailingStopEngine};
