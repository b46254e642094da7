//! Configuration module for the trade guard layer.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation. Every section has defaults, so an empty document is a
//! valid configuration.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trade_guard::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! let retry = RetryExecutor::new(config.retry.to_policy());
//! let trailing = config.trailing.to_trailing_config();
//! ```

mod observability;
mod orders;
mod retry;
mod sizing;
mod symbols;
mod trailing;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use observability::{LoggingConfig, ObservabilityConfig, OtelConfig};
pub use orders::OrdersConfig;
pub use retry::RetryConfig;
pub use sizing::SizingConfig;
pub use symbols::SymbolsConfig;
pub use trailing::TrailingEngineConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Retry policy for gateway calls.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Trailing stop engine.
    #[serde(default)]
    pub trailing: TrailingEngineConfig,
    /// Symbol constraints cache.
    #[serde(default)]
    pub symbols: SymbolsConfig,
    /// Risk sizing.
    #[serde(default)]
    pub sizing: SizingConfig,
    /// Order submission defaults.
    #[serde(default)]
    pub orders: OrdersConfig,
    /// Logging and tracing export.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let retry = &config.retry;

    if retry.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "retry.max_attempts must be at least 1".to_string(),
        ));
    }

    if retry.max_delay_ms < retry.initial_delay_ms {
        return Err(ConfigError::ValidationError(
            "retry.max_delay_ms must not be less than retry.initial_delay_ms".to_string(),
        ));
    }

    if retry.multiplier < 1.0 {
        return Err(ConfigError::ValidationError(
            "retry.multiplier must be at least 1.0".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&retry.jitter_factor) {
        return Err(ConfigError::ValidationError(
            "retry.jitter_factor must be between 0.0 and 1.0".to_string(),
        ));
    }

    if config.trailing.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "trailing.poll_interval_ms must be positive".to_string(),
        ));
    }

    Ok(())
}
