//! Symbol constraints cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Symbol constraints cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolsConfig {
    /// How long a fetched constraints snapshot stays fresh, in milliseconds.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
}

impl Default for SymbolsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: default_cache_ttl_ms(),
        }
    }
}

impl SymbolsConfig {
    /// Cache TTL as a duration.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

const fn default_cache_ttl_ms() -> u64 {
    5_000
}
