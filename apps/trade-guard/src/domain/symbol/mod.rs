//! Symbol trading constraints and grid normalization.
//!
//! Brokers reject orders whose price or volume is off their precision/step
//! grid. Everything here is pure: once a [`SymbolConstraints`] snapshot has
//! been fetched, no further network access is needed to normalize values.

mod constraints;
mod errors;
mod normalizer;

pub use constraints::SymbolConstraints;
pub use errors::{ConstraintsError, VolumeError};
pub use normalizer::{
    floor_to_step, is_on_step, normalize_price, normalize_volume, points_to_price,
};
