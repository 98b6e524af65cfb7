//! Role-Based Access Control (RBAC) with organization-scoped tenancy.
//!
//! This module provides:
//! - **Permissions**: the closed `namespace.action[.qualifier]` catalog
//! - **Models**: actors, memberships, roles and resource descriptors
//! - **Roles**: the fixed OWNER / ADMIN / MEMBER permission table
//! - **Policy**: the `can` decision function, combinators and the `Authorizer` facade
//! - **Requests**: a flat, serializable request shape for callers holding raw identifiers
//!
//! # Usage
//!
//! ```rust
//! use taskgate_core::rbac::{can, Actor, AuthorizationContext, Permission, ResourceDescriptor, Role};
//!
//! let actor = Actor::new("u1", "u1@example.com").with_membership("org-1", Role::Member);
//! let ctx = AuthorizationContext::new(actor)
//!     .with_resource(ResourceDescriptor::task("org-1").created_by("u1"));
//!
//! assert!(can(Permission::TaskUpdateOwn, &ctx));
//! assert!(!can(Permission::TaskDelete, &ctx));
//! ```

pub mod models;
pub mod permission;
pub mod policy;
pub mod request;
pub mod roles;

mod refiner;
mod tenancy;

pub use models::{
    Actor, Membership, OrganizationId, ResourceDescriptor, ResourceType, Role, UserId,
};
pub use permission::{Namespace, Permission, Qualifier};
pub use policy::{
    can, can_all, can_any, AuthorizationContext, Authorizer, Decision, Principal,
    SystemPrincipal,
};
pub use request::{decide, DecisionRequest, DecisionResponse};
pub use roles::RoleTable;
