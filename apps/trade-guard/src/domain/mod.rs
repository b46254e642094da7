//! Domain Layer
//!
//! The innermost layer containing the order and risk arithmetic, with zero
//! infrastructure dependencies. Everything here is pure and synchronous.
//!
//! # Bounded Contexts
//!
//! - [`symbol`]: Per-symbol constraints and price/volume grid normalization
//! - [`sizing`]: Risk-based position sizing and order plans
//! - [`pending`]: Pending order type-invariant validation
//! - [`partial_close`]: Partial close volume resolution
//! - [`trailing`]: Trailing stop ratchet policy

pub mod partial_close;
pub mod pending;
pub mod shared;
pub mod sizing;
pub mod symbol;
pub mod trailing;
