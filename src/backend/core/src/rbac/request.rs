//! Flat, serializable decision request for callers that hold identifiers
//! rather than typed values (HTTP handlers, job payloads, the CLI).
//!
//! Fields are carried as strings and validated on conversion, so a bad token
//! surfaces as a typed error instead of a generic decode failure.

use serde::{Deserialize, Serialize};

use super::models::{Actor, ResourceDescriptor, ResourceType, Role};
use super::permission::Permission;
use super::policy::{can, AuthorizationContext};
use crate::error::{Result, TaskgateError};

/// A single decision request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub permission: String,
    pub actor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_creator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_assignee_id: Option<String>,
}

/// Outcome of [`decide`]. Carries no reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub allow: bool,
}

impl DecisionRequest {
    pub fn new(permission: Permission, actor_id: impl Into<String>) -> Self {
        Self {
            permission: permission.as_str().to_string(),
            actor_id: actor_id.into(),
            ..Self::default()
        }
    }

    pub fn membership(mut self, organization_id: impl Into<String>, role: Role) -> Self {
        self.organization_id = Some(organization_id.into());
        self.role = Some(role.as_str().to_string());
        self
    }

    pub fn resource(mut self, resource_type: ResourceType, organization_id: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.as_str().to_string());
        self.resource_organization_id = Some(organization_id.into());
        self
    }

    pub fn created_by(mut self, user_id: impl Into<String>) -> Self {
        self.resource_creator_id = Some(user_id.into());
        self
    }

    pub fn assigned_to(mut self, user_id: impl Into<String>) -> Self {
        self.resource_assignee_id = Some(user_id.into());
        self
    }

    /// Validate and convert into typed inputs for the decision function.
    ///
    /// Tokens are trimmed. Permission tokens must match the catalog exactly;
    /// role and resource type names match in any case.
    pub fn to_context(&self) -> Result<(Permission, AuthorizationContext)> {
        let permission: Permission = self.permission.trim().parse()?;

        if self.actor_id.trim().is_empty() {
            return Err(TaskgateError::invalid_request("actorId must not be empty"));
        }

        let mut actor = Actor::new(
            self.actor_id.as_str(),
            self.actor_email.clone().unwrap_or_default(),
        );

        match (&self.organization_id, &self.role) {
            (Some(org), Some(role)) => {
                let role: Role = role.trim().parse()?;
                actor = actor.with_membership(org.as_str(), role);
            }
            (None, None) => {}
            _ => {
                return Err(TaskgateError::invalid_request(
                    "organizationId and role must be given together",
                ))
            }
        }

        let mut ctx = AuthorizationContext::new(actor);

        match &self.resource_type {
            Some(resource_type) => {
                let resource_type: ResourceType = resource_type.trim().parse()?;
                let org = self.resource_organization_id.as_deref().ok_or_else(|| {
                    TaskgateError::invalid_request("resourceOrganizationId is required with resourceType")
                })?;

                let mut resource = ResourceDescriptor::new(resource_type, org);
                if let Some(creator) = &self.resource_creator_id {
                    resource = resource.created_by(creator.as_str());
                }
                if let Some(assignee) = &self.resource_assignee_id {
                    resource = resource.assigned_to(assignee.as_str());
                }
                ctx = ctx.with_resource(resource);
            }
            None => {
                if self.resource_organization_id.is_some()
                    || self.resource_creator_id.is_some()
                    || self.resource_assignee_id.is_some()
                {
                    return Err(TaskgateError::invalid_request(
                        "resource fields require resourceType",
                    ));
                }
            }
        }

        Ok((permission, ctx))
    }
}

/// Convert a flat request and run [`can`] on it.
pub fn decide(request: &DecisionRequest) -> Result<DecisionResponse> {
    let (permission, ctx) = request.to_context()?;
    Ok(DecisionResponse {
        allow: can(permission, &ctx),
    })
}
