//! Trailing stop engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::services::TrailingConfig;

/// Trailing engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailingEngineConfig {
    /// Price polling interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for TrailingEngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl TrailingEngineConfig {
    /// Convert to the runtime engine configuration.
    #[must_use]
    pub const fn to_trailing_config(&self) -> TrailingConfig {
        TrailingConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

const fn default_poll_interval_ms() -> u64 {
    500
}
