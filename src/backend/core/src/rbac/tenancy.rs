//! Tenancy guard: the checks that run before any permission logic.
//!
//! In order:
//! 1. the system principal is admitted unconditionally
//! 2. an actor without a membership (or with someone else's) is rejected
//! 3. a resource owned by another organization is rejected, whatever the
//!    actor's role or any creator/assignee match

use super::models::{Actor, Membership};
use super::policy::{AuthorizationContext, DenyReason, Principal};

/// Outcome of a successful tenancy check.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Admission<'a> {
    /// Maintenance automation; skips every later stage.
    Bypass,
    /// An ordinary actor, admitted into their own organization.
    Member {
        actor: &'a Actor,
        membership: &'a Membership,
    },
}

pub(crate) fn admit(ctx: &AuthorizationContext) -> Result<Admission<'_>, DenyReason> {
    let actor = match &ctx.principal {
        Principal::System(_) => return Ok(Admission::Bypass),
        Principal::Actor(actor) => actor,
    };

    let membership = actor.membership.as_ref().ok_or(DenyReason::NoMembership)?;
    if membership.user_id != actor.id {
        return Err(DenyReason::MembershipMismatch);
    }

    if let Some(resource) = &ctx.resource {
        if resource.organization_id != membership.organization_id {
            return Err(DenyReason::CrossTenant);
        }
    }

    Ok(Admission::Member { actor, membership })
}
