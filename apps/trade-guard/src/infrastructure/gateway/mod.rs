//! Trading gateway adapters.

mod paper;

pub use paper::{PaperCall, PaperGateway};
