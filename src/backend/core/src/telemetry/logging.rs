//! Structured logging with JSON, pretty and compact formats.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the host process, which may call [`init_logging`] once at startup.

use serde::Deserialize;
use std::collections::HashMap;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty or compact)
    #[serde(default)]
    pub format: LogFormat,

    /// Per-module log levels
    #[serde(default)]
    pub module_levels: HashMap<String, String>,

    /// Whether to include target (module path)
    #[serde(default = "default_include_target")]
    pub include_target: bool,

    /// Write to stderr instead of stdout
    #[serde(default)]
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            module_levels: HashMap::new(),
            include_target: default_include_target(),
            stderr: false,
        }
    }
}

impl LoggingConfig {
    /// Build a filter from the global level plus per-module overrides.
    pub fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level)?;
        for (module, level) in &self.module_levels {
            let directive = format!("{}={}", module, level);
            filter = filter.add_directive(directive.parse()?);
        }
        Ok(filter)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format for production/structured logging
    #[default]
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact single-line format
    Compact,
}

fn default_log_level() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}

fn default_include_target() -> bool {
    true
}

/// Initialize the global `tracing` subscriber.
///
/// # Errors
///
/// Returns an error if the filter is malformed or a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = config.env_filter()?;

    macro_rules! install {
        ($layer:expr) => {{
            if config.stderr {
                tracing_subscriber::registry()
                    .with(filter)
                    .with($layer.with_writer(std::io::stderr))
                    .try_init()?;
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with($layer)
                    .try_init()?;
            }
        }};
    }

    match config.format {
        LogFormat::Json => install!(fmt::layer().json().with_target(config.include_target)),
        LogFormat::Pretty => install!(fmt::layer().pretty().with_target(config.include_target)),
        LogFormat::Compact => install!(fmt::layer().compact().with_target(config.include_target)),
    }

    Ok(())
}
