//! Order submission settings shared by the use cases.

use serde::{Deserialize, Serialize};

/// Defaults applied to every order sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSettings {
    /// Maximum slippage for market orders and closes, in points.
    pub deviation_points: u32,
    /// Comment attached to orders when the caller gives none.
    pub comment: Option<String>,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            deviation_points: 10,
            comment: Some("trade-guard".to_string()),
        }
    }
}
