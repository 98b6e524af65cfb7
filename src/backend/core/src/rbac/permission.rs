//! The permission catalog: every capability token the engine knows about.
//!
//! Tokens are namespaced `<resource>.<verb>[.<qualifier>]`, for example:
//! - `organization.delete`
//! - `member.update_role`
//! - `task.update.own`
//! - `attachment.delete.own`
//!
//! The catalog is closed. Adding a token means adding an enum variant, which
//! forces every `match` over [`Permission`] (role table, refiner) to be
//! revisited by the compiler.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TaskgateError;

// ═══════════════════════════════════════════════════════════════════════════════
// Namespace
// ═══════════════════════════════════════════════════════════════════════════════

/// The resource namespace a permission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Organization,
    Member,
    Project,
    Task,
    Comment,
    Attachment,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Member => "member",
            Self::Project => "project",
            Self::Task => "task",
            Self::Comment => "comment",
            Self::Attachment => "attachment",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = TaskgateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "organization" => Ok(Self::Organization),
            "member" => Ok(Self::Member),
            "project" => Ok(Self::Project),
            "task" => Ok(Self::Task),
            "comment" => Ok(Self::Comment),
            "attachment" => Ok(Self::Attachment),
            _ => Err(TaskgateError::invalid_request(format!("Unknown namespace: {}", value))),
        }
    }
}

/// Identity qualifier carried by resource-scoped permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// Granted only when the actor created the resource.
    Own,
    /// Granted only when the actor is assigned to the resource.
    Assigned,
}

impl Qualifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Own => "own",
            Self::Assigned => "assigned",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Permission
// ═══════════════════════════════════════════════════════════════════════════════

/// An atomic capability token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    OrganizationView,
    OrganizationUpdate,
    OrganizationDelete,

    MemberView,
    MemberInvite,
    MemberRemove,
    MemberUpdateRole,

    ProjectView,
    ProjectCreate,
    ProjectUpdate,
    ProjectDelete,

    TaskView,
    TaskCreate,
    TaskUpdate,
    TaskUpdateOwn,
    TaskUpdateAssigned,
    TaskDelete,

    CommentView,
    CommentCreate,
    CommentUpdate,
    CommentUpdateOwn,
    CommentDelete,
    CommentDeleteOwn,

    AttachmentView,
    AttachmentCreate,
    AttachmentDelete,
    AttachmentDeleteOwn,
}

impl Permission {
    /// The full catalog, in declaration order.
    pub const ALL: [Permission; 27] = [
        Self::OrganizationView,
        Self::OrganizationUpdate,
        Self::OrganizationDelete,
        Self::MemberView,
        Self::MemberInvite,
        Self::MemberRemove,
        Self::MemberUpdateRole,
        Self::ProjectView,
        Self::ProjectCreate,
        Self::ProjectUpdate,
        Self::ProjectDelete,
        Self::TaskView,
        Self::TaskCreate,
        Self::TaskUpdate,
        Self::TaskUpdateOwn,
        Self::TaskUpdateAssigned,
        Self::TaskDelete,
        Self::CommentView,
        Self::CommentCreate,
        Self::CommentUpdate,
        Self::CommentUpdateOwn,
        Self::CommentDelete,
        Self::CommentDeleteOwn,
        Self::AttachmentView,
        Self::AttachmentCreate,
        Self::AttachmentDelete,
        Self::AttachmentDeleteOwn,
    ];

    /// Canonical token string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OrganizationView => "organization.view",
            Self::OrganizationUpdate => "organization.update",
            Self::OrganizationDelete => "organization.delete",
            Self::MemberView => "member.view",
            Self::MemberInvite => "member.invite",
            Self::MemberRemove => "member.remove",
            Self::MemberUpdateRole => "member.update_role",
            Self::ProjectView => "project.view",
            Self::ProjectCreate => "project.create",
            Self::ProjectUpdate => "project.update",
            Self::ProjectDelete => "project.delete",
            Self::TaskView => "task.view",
            Self::TaskCreate => "task.create",
            Self::TaskUpdate => "task.update",
            Self::TaskUpdateOwn => "task.update.own",
            Self::TaskUpdateAssigned => "task.update.assigned",
            Self::TaskDelete => "task.delete",
            Self::CommentView => "comment.view",
            Self::CommentCreate => "comment.create",
            Self::CommentUpdate => "comment.update",
            Self::CommentUpdateOwn => "comment.update.own",
            Self::CommentDelete => "comment.delete",
            Self::CommentDeleteOwn => "comment.delete.own",
            Self::AttachmentView => "attachment.view",
            Self::AttachmentCreate => "attachment.create",
            Self::AttachmentDelete => "attachment.delete",
            Self::AttachmentDeleteOwn => "attachment.delete.own",
        }
    }

    /// The namespace (first token segment).
    pub fn namespace(self) -> Namespace {
        match self {
            Self::OrganizationView | Self::OrganizationUpdate | Self::OrganizationDelete => {
                Namespace::Organization
            }
            Self::MemberView | Self::MemberInvite | Self::MemberRemove | Self::MemberUpdateRole => {
                Namespace::Member
            }
            Self::ProjectView | Self::ProjectCreate | Self::ProjectUpdate | Self::ProjectDelete => {
                Namespace::Project
            }
            Self::TaskView
            | Self::TaskCreate
            | Self::TaskUpdate
            | Self::TaskUpdateOwn
            | Self::TaskUpdateAssigned
            | Self::TaskDelete => Namespace::Task,
            Self::CommentView
            | Self::CommentCreate
            | Self::CommentUpdate
            | Self::CommentUpdateOwn
            | Self::CommentDelete
            | Self::CommentDeleteOwn => Namespace::Comment,
            Self::AttachmentView
            | Self::AttachmentCreate
            | Self::AttachmentDelete
            | Self::AttachmentDeleteOwn => Namespace::Attachment,
        }
    }

    /// The identity qualifier, if this is a resource-scoped permission.
    pub fn qualifier(self) -> Option<Qualifier> {
        match self {
            Self::TaskUpdateOwn
            | Self::CommentUpdateOwn
            | Self::CommentDeleteOwn
            | Self::AttachmentDeleteOwn => Some(Qualifier::Own),
            Self::TaskUpdateAssigned => Some(Qualifier::Assigned),
            _ => None,
        }
    }

    /// Whether the grant depends on comparing the actor against resource fields.
    pub fn is_identity_conditioned(self) -> bool {
        self.qualifier().is_some()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = TaskgateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == value)
            .ok_or_else(|| TaskgateError::unknown_permission(value))
    }
}

impl Serialize for Permission {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
