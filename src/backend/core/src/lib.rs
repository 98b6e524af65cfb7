#![allow(clippy::result_large_err)]
//! # Taskgate Core
//!
//! Authorization for a multi-tenant task-management backend.
//!
//! ## Architecture
//!
//! - **Permissions**: a closed catalog of `namespace.action[.qualifier]` tokens
//! - **Roles**: a fixed OWNER / ADMIN / MEMBER permission table
//! - **Tenancy**: organization membership guards every decision
//! - **Refiners**: resource-scoped checks for ownership, assignment and role rank
//! - **Authorizer**: request-path facade with audit logging and metrics
//! - **Telemetry**: `tracing` initialization and decision counters

pub mod config;
pub mod error;
pub mod rbac;
pub mod telemetry;

pub use error::{ErrorCode, Result, TaskgateError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{AuthzConfig, Config};
    pub use crate::error::{ErrorCode, Result, TaskgateError};
    pub use crate::rbac::{
        can, can_all, can_any, decide, Actor, AuthorizationContext, Authorizer, Decision,
        DecisionRequest, DecisionResponse, Membership, OrganizationId, Permission, Principal,
        ResourceDescriptor, ResourceType, Role, RoleTable, SystemPrincipal, UserId,
    };
}
