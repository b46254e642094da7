//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod quote;
mod side;
mod symbol;
mod ticket;

pub use quote::PriceQuote;
pub use side::{PositionSide, Side};
pub use symbol::Symbol;
pub use ticket::Ticket;
