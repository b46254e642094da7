//! OpenTelemetry Tracing Setup
//!
//! Installs the global `tracing` subscriber for an embedding application.
//!
//! # Configuration
//!
//! Values come from [`ObservabilityConfig`]; environment variables win:
//!
//! - `RUST_LOG`: filter directives (default: `observability.logging.level`)
//! - `OTEL_ENABLED`: Set to `false` to disable OTLP export (console only)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP gRPC endpoint
//! - `OTEL_SERVICE_NAME`: Service name for traces
//!
//! # Usage
//!
//! ```rust,ignore
//! use trade_guard::telemetry::init_telemetry;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = trade_guard::config::load_config(None)?;
//!     let _guard = init_telemetry(&config.observability);
//!     // ... application code
//! }
//! ```

use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Guard that shuts down the tracer provider on drop.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are exported over OTLP.
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Error shutting down tracer provider: {e:?}");
        }
    }
}

fn init_console(env_filter: EnvFilter, with_target: bool) {
    // A subscriber installed earlier (tests, host application) keeps priority.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(with_target)
        .try_init();
}

/// Initialize logging and, if enabled, OpenTelemetry export.
///
/// Returns a guard that will shut down the tracer provider when dropped.
/// If a global subscriber is already installed, this leaves it in place.
#[must_use]
pub fn init_telemetry(config: &ObservabilityConfig) -> TelemetryGuard {
    let otel_enabled = std::env::var("OTEL_ENABLED")
        .map(|v| v != "false")
        .unwrap_or(config.otel.enabled);

    let with_target = config.logging.with_target;
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if !otel_enabled {
        init_console(env_filter, with_target);
        tracing::info!("OpenTelemetry disabled, using console logging only");
        return TelemetryGuard { provider: None };
    }

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| config.otel.endpoint.clone());

    let service_name = std::env::var("OTEL_SERVICE_NAME")
        .unwrap_or_else(|_| config.otel.service_name.clone());

    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
    {
        Ok(exp) => exp,
        Err(e) => {
            eprintln!("Failed to create OTLP exporter: {e:?}, falling back to console logging");
            init_console(env_filter, with_target);
            return TelemetryGuard { provider: None };
        }
    };

    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(exporter)
        .build();

    let tracer = provider.tracer(service_name.clone());
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(with_target);

    if Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .is_err()
    {
        let _ = provider.shutdown();
        return TelemetryGuard { provider: None };
    }

    tracing::info!(
        service_name = %service_name,
        endpoint = %endpoint,
        "OpenTelemetry initialized"
    );

    TelemetryGuard {
        provider: Some(provider),
    }
}
