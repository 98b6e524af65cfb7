//! Configuration management.
//!
//! Values come from an optional file plus `TASKGATE__*` environment
//! variables, e.g. `TASKGATE__AUTHZ__AUDIT_DECISIONS=false`. The role table is
//! compiled in and is not configurable.

use serde::Deserialize;

use crate::error::Result;
use crate::telemetry::logging::LogFormat;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Authorization facade configuration
    #[serde(default)]
    pub authz: AuthzConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthzConfig {
    /// Log every decision made through `Authorizer`
    #[serde(default = "default_audit_decisions")]
    pub audit_decisions: bool,

    /// Count decisions through the `metrics` facade
    #[serde(default = "default_record_metrics")]
    pub record_metrics: bool,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            audit_decisions: default_audit_decisions(),
            record_metrics: default_record_metrics(),
        }
    }
}

// Default value functions
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> LogFormat { LogFormat::Pretty }
fn default_audit_decisions() -> bool { true }
fn default_record_metrics() -> bool { true }

const ENV_PREFIX: &str = "TASKGATE";

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Load from a specific file path, with environment overrides.
    pub fn from_file(path: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
        assert!(config.authz.audit_decisions);
        assert!(config.authz.record_metrics);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[observability]\nlog_level = \"debug\"\nlog_format = \"json\"\n\n[authz]\naudit_decisions = false"
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(!config.authz.audit_decisions);
        assert!(config.authz.record_metrics);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = Config::from_file("/nonexistent/taskgate-config").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
    }
}
