//! Partial close volume computation.
//!
//! Resolves a percentage or exact-volume close request against the live
//! position volume and the symbol lot grid. Rounding is always down so a
//! close never exceeds what was asked for.

mod calculator;
mod errors;
mod request;

pub use calculator::PartialCloseCalculator;
pub use errors::PartialCloseError;
pub use request::{CloseAmount, PartialCloseRequest};
