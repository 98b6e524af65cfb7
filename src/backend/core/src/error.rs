//! Error handling for Taskgate Core.
//!
//! Authorization decisions never fail: they return ALLOW or DENY. Errors exist
//! only at the edges of the engine:
//! - parsing tokens, roles and resource types from strings
//! - validating a [`DecisionRequest`](crate::rbac::DecisionRequest)
//! - loading configuration
//! - converting a DENY into a caller-facing failure via `Authorizer::enforce`
//!
//! # Usage
//!
//! ```rust,ignore
//! use taskgate_core::error::{ErrorCode, Result};
//!
//! fn handler(authorizer: &Authorizer, ctx: &AuthorizationContext) -> Result<()> {
//!     authorizer.enforce(Permission::TaskDelete, ctx)?;
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// Result Type Alias
// ═══════════════════════════════════════════════════════════════════════════════

/// A specialized Result type for Taskgate operations.
pub type Result<T> = std::result::Result<T, TaskgateError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Codes
// ═══════════════════════════════════════════════════════════════════════════════

/// Machine-readable error codes.
///
/// These codes are stable and can be used by callers for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authorization (4000-4099)
    Forbidden,

    // Request validation (4100-4199)
    InvalidRequest,
    UnknownPermission,
    UnknownRole,
    UnknownResourceType,

    // Serialization (2200-2299)
    SerializationError,

    // Configuration (5000-5099)
    ConfigurationError,

    // Internal (9000-9099)
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub const fn numeric_code(&self) -> u32 {
        match self {
            Self::Forbidden => 4001,
            Self::InvalidRequest => 4100,
            Self::UnknownPermission => 4101,
            Self::UnknownRole => 4102,
            Self::UnknownResourceType => 4103,
            Self::SerializationError => 2200,
            Self::ConfigurationError => 5000,
            Self::InternalError => 9000,
        }
    }

    /// HTTP status a caller should answer with when surfacing this error.
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Forbidden => 403,
            Self::InvalidRequest
            | Self::UnknownPermission
            | Self::UnknownRole
            | Self::UnknownResourceType => 422,
            Self::SerializationError => 400,
            Self::ConfigurationError | Self::InternalError => 500,
        }
    }

    /// Get the error category for grouping.
    pub const fn category(&self) -> &'static str {
        match self.numeric_code() {
            2200..=2299 => "serialization",
            4000..=4099 => "authorization",
            4100..=4199 => "validation",
            5000..=5099 => "configuration",
            9000..=9099 => "internal",
            _ => "unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main Error Type
// ═══════════════════════════════════════════════════════════════════════════════

/// The main error type for Taskgate Core.
#[derive(Error, Debug)]
pub struct TaskgateError {
    code: ErrorCode,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl fmt::Display for TaskgateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl TaskgateError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// The denial every caller sees. It never names the check that failed.
    pub fn forbidden() -> Self {
        Self::new(ErrorCode::Forbidden, "Forbidden")
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unknown_permission(token: &str) -> Self {
        Self::new(
            ErrorCode::UnknownPermission,
            format!("Unknown permission: {token:?}"),
        )
    }

    pub fn unknown_role(role: &str) -> Self {
        Self::new(ErrorCode::UnknownRole, format!("Unknown role: {role:?}"))
    }

    pub fn unknown_resource_type(resource_type: &str) -> Self {
        Self::new(
            ErrorCode::UnknownResourceType,
            format!("Unknown resource type: {resource_type:?}"),
        )
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigurationError, message)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Conversions
// ═══════════════════════════════════════════════════════════════════════════════

impl From<serde_json::Error> for TaskgateError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, format!("Invalid JSON: {error}"))
            .with_source(error)
    }
}

impl From<config::ConfigError> for TaskgateError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string()).with_source(error)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
