//! Trailing stop policy.
//!
//! Pure ratchet logic used by the trailing engine. A [`TrailState`] turns a
//! stream of reference prices into stop-loss updates that only ever move
//! toward profit.

mod errors;
mod params;
mod state;

pub use errors::TrailError;
pub use params::{TrailMode, TrailParams};
pub use state::TrailState;
