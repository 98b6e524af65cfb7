//! Telemetry: logging initialization and decision metrics.
//!
//! - **Logging**: `tracing` events with JSON/pretty/compact output
//! - **Metrics**: decision counters through the `metrics` facade
//!
//! # Example
//!
//! ```rust,no_run
//! use taskgate_core::telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::default();
//! init_telemetry(&config).expect("Failed to initialize telemetry");
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::DecisionMetrics;

use serde::Deserialize;

use crate::config::ObservabilityConfig;

/// Unified telemetry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TelemetryConfig {
    /// Derive telemetry settings from the application's observability section.
    pub fn from_observability(service_name: impl Into<String>, config: &ObservabilityConfig) -> Self {
        Self {
            service_name: service_name.into(),
            logging: LoggingConfig {
                level: config.log_level.clone(),
                format: config.log_format,
                ..LoggingConfig::default()
            },
        }
    }
}

fn default_service_name() -> String {
    "taskgate-core".to_string()
}

/// Initialize logging and register metric descriptions.
///
/// Call once at process startup.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.logging)?;
    DecisionMetrics::describe();

    ::tracing::info!(
        service_name = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );
    Ok(())
}
