//! Order submission defaults.

use serde::{Deserialize, Serialize};

use crate::application::use_cases::OrderSettings;

/// Order submission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersConfig {
    /// Maximum slippage for market orders and closes, in points.
    #[serde(default = "default_deviation_points")]
    pub deviation_points: u32,
    /// Comment attached to orders when the caller gives none. Empty disables it.
    #[serde(default = "default_comment")]
    pub comment: String,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            deviation_points: default_deviation_points(),
            comment: default_comment(),
        }
    }
}

impl OrdersConfig {
    /// Convert to the use case settings.
    #[must_use]
    pub fn to_order_settings(&self) -> OrderSettings {
        OrderSettings {
            deviation_points: self.deviation_points,
            comment: Some(self.comment.clone()).filter(|c| !c.is_empty()),
        }
    }
}

const fn default_deviation_points() -> u32 {
    10
}

fn default_comment() -> String {
    "trade-guard".to_string()
}
