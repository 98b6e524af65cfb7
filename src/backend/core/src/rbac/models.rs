//! RBAC data models: identifiers, roles, memberships, actors and resource descriptors.
//!
//! All of these are built fresh per decision from already-authenticated
//! session data and a resource lookup. Nothing here is cached by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::permission::Namespace;
use crate::error::TaskgateError;

// ═══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════════════

/// Strongly-typed user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn from_uuid() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Strongly-typed organization (tenant) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(pub String);

impl OrganizationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn from_uuid() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OrganizationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrganizationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Role
// ═══════════════════════════════════════════════════════════════════════════════

/// Organization-level role held through a membership.
///
/// Ordered by privilege: `Member < Admin < Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Member,
    Admin,
    Owner,
}

impl Role {
    pub const ALL: [Role; 3] = [Self::Owner, Self::Admin, Self::Member];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Owner => "Full control, including organization deletion and role changes",
            Self::Admin => "Manage projects, tasks, comments, attachments and membership",
            Self::Member => "View the organization and work on own or assigned tasks",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TaskgateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "OWNER" => Ok(Self::Owner),
            "ADMIN" => Ok(Self::Admin),
            "MEMBER" => Ok(Self::Member),
            _ => Err(TaskgateError::unknown_role(value)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Membership / Actor
// ═══════════════════════════════════════════════════════════════════════════════

/// Membership record linking a user to an organization with a role.
///
/// At most one membership exists per (user, organization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
    pub role: Role,
}

impl Membership {
    pub fn new(user_id: UserId, organization_id: OrganizationId, role: Role) -> Self {
        Self {
            user_id,
            organization_id,
            role,
        }
    }
}

/// The authenticated identity attempting an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub email: String,
    /// Membership in the organization the request targets. `None` means the
    /// actor holds no permissions at all.
    pub membership: Option<Membership>,
}

impl Actor {
    /// Create an actor with no membership.
    pub fn new(id: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            membership: None,
        }
    }

    /// Attach a membership for this actor in `organization_id`.
    pub fn with_membership(mut self, organization_id: impl Into<OrganizationId>, role: Role) -> Self {
        self.membership = Some(Membership::new(
            self.id.clone(),
            organization_id.into(),
            role,
        ));
        self
    }

    pub fn role(&self) -> Option<Role> {
        self.membership.as_ref().map(|m| m.role)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Resource Descriptor
// ═══════════════════════════════════════════════════════════════════════════════

/// Kind of resource a decision targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Organization,
    Project,
    Task,
    Comment,
    Attachment,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Project => "project",
            Self::Task => "task",
            Self::Comment => "comment",
            Self::Attachment => "attachment",
        }
    }

    /// Whether a permission in `namespace` may compare identity fields of
    /// this resource type. Membership permissions are organization-scoped and
    /// accept any resource as their tenancy anchor.
    pub fn matches_namespace(self, namespace: Namespace) -> bool {
        match namespace {
            Namespace::Member => true,
            Namespace::Organization => self == Self::Organization,
            Namespace::Project => self == Self::Project,
            Namespace::Task => self == Self::Task,
            Namespace::Comment => self == Self::Comment,
            Namespace::Attachment => self == Self::Attachment,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = TaskgateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "organization" => Ok(Self::Organization),
            "project" => Ok(Self::Project),
            "task" => Ok(Self::Task),
            "comment" => Ok(Self::Comment),
            "attachment" => Ok(Self::Attachment),
            _ => Err(TaskgateError::unknown_resource_type(value)),
        }
    }
}

/// The fields of a target resource the engine needs for a decision.
///
/// Every tenant-scoped resource carries its owning organization; the
/// creator and assignee are only consulted by identity-conditioned
/// permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub resource_type: ResourceType,
    pub organization_id: OrganizationId,
    pub creator_id: Option<UserId>,
    pub assignee_id: Option<UserId>,
}

impl ResourceDescriptor {
    pub fn new(resource_type: ResourceType, organization_id: impl Into<OrganizationId>) -> Self {
        Self {
            resource_type,
            organization_id: organization_id.into(),
            creator_id: None,
            assignee_id: None,
        }
    }

    pub fn organization(organization_id: impl Into<OrganizationId>) -> Self {
        Self::new(ResourceType::Organization, organization_id)
    }

    pub fn project(organization_id: impl Into<OrganizationId>) -> Self {
        Self::new(ResourceType::Project, organization_id)
    }

    pub fn task(organization_id: impl Into<OrganizationId>) -> Self {
        Self::new(ResourceType::Task, organization_id)
    }

    pub fn comment(organization_id: impl Into<OrganizationId>) -> Self {
        Self::new(ResourceType::Comment, organization_id)
    }

    pub fn attachment(organization_id: impl Into<OrganizationId>) -> Self {
        Self::new(ResourceType::Attachment, organization_id)
    }

    /// Record who created the resource.
    pub fn created_by(mut self, user_id: impl Into<UserId>) -> Self {
        self.creator_id = Some(user_id.into());
        self
    }

    /// Record who the resource is assigned to.
    pub fn assigned_to(mut self, user_id: impl Into<UserId>) -> Self {
        self.assignee_id = Some(user_id.into());
        self
    }

    pub fn is_created_by(&self, user_id: &UserId) -> bool {
        self.creator_id.as_ref() == Some(user_id)
    }

    pub fn is_assigned_to(&self, user_id: &UserId) -> bool {
        self.assignee_id.as_ref() == Some(user_id)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
