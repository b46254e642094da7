//! Risk-based position sizing.
//!
//! Converts a stop distance (in points) and a money-risk budget into a lot
//! volume that loses exactly the budget if the stop is hit, then places it
//! on the broker's lot grid.
//!
//! # Example
//!
//! ```rust,ignore
//! use trade_guard::domain::sizing::{RiskRequest, RiskSizer};
//! use rust_decimal_macros::dec;
//!
//! let sizer = RiskSizer::default();
//! let request = RiskRequest::new("EURUSD", Side::Buy, dec!(100), dec!(10));
//!
//! // 100 points at $10/point/lot, $10 at risk
//! let sized = sizer.size(&request, &constraints)?;
//! assert_eq!(sized.volume, dec!(0.01));
//! ```

mod error;
mod plan;
mod sizer;
mod types;

pub use error::SizingError;
pub use plan::OrderPlan;
pub use sizer::{RiskSizer, RiskSizerConfig};
pub use types::{MinimumLotPolicy, RiskRequest, SizedVolume};
