//! Policy evaluation: the `can` decision function and its combinators.
//!
//! The engine answers one question:
//! "May this principal exercise permission P, optionally on resource R?"
//!
//! Evaluation order is fixed:
//! 1. tenancy guard (system bypass, membership, same-organization resource)
//! 2. role-permission table lookup
//! 3. no resource: the role grant is final
//! 4. resource present: the resource-scoped refiner is final
//!
//! Every stage is synchronous and side-effect free: `can` and its combinators
//! never log or count. Audit events and metrics come from [`Authorizer`]. The only
//! outcomes are ALLOW and DENY; callers never learn why a DENY happened.

use tracing::{debug, info, warn};

use super::models::{Actor, OrganizationId, ResourceDescriptor};
use super::permission::Permission;
use super::refiner;
use super::roles::RoleTable;
use super::tenancy::{self, Admission};
use crate::config::AuthzConfig;
use crate::error::{Result, TaskgateError};
use crate::telemetry::metrics::DecisionMetrics;

// ═══════════════════════════════════════════════════════════════════════════════
// Principal / Context
// ═══════════════════════════════════════════════════════════════════════════════

/// The administrative principal used by maintenance automation.
///
/// It has no identifier and no serde implementation, so it cannot be
/// produced from session data or a decoded request. Only code linked into the
/// process can create one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrincipal {
    _private: (),
}

impl SystemPrincipal {
    pub fn maintenance() -> Self {
        Self { _private: () }
    }
}

/// Who is asking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    System(SystemPrincipal),
    Actor(Actor),
}

/// Per-call input to the decision function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationContext {
    pub principal: Principal,
    pub resource: Option<ResourceDescriptor>,
}

impl AuthorizationContext {
    /// Context for an ordinary actor with no target resource.
    pub fn new(actor: Actor) -> Self {
        Self {
            principal: Principal::Actor(actor),
            resource: None,
        }
    }

    /// Context for the maintenance principal.
    pub fn system() -> Self {
        Self {
            principal: Principal::System(SystemPrincipal::maintenance()),
            resource: None,
        }
    }

    /// Target a specific resource.
    pub fn with_resource(mut self, resource: ResourceDescriptor) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn actor(&self) -> Option<&Actor> {
        match &self.principal {
            Principal::Actor(actor) => Some(actor),
            Principal::System(_) => None,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self.principal, Principal::System(_))
    }

    fn organization_id(&self) -> Option<&OrganizationId> {
        self.actor()
            .and_then(|a| a.membership.as_ref())
            .map(|m| &m.organization_id)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Evaluation
// ═══════════════════════════════════════════════════════════════════════════════

/// Why a decision was denied. Internal only: surfaced to logs and metrics,
/// never to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DenyReason {
    NoMembership,
    MembershipMismatch,
    CrossTenant,
    NotGranted,
    NotCreator,
    NotAssignee,
    RoleRestricted,
    ResourceTypeMismatch,
}

impl DenyReason {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::NoMembership => "no_membership",
            Self::MembershipMismatch => "membership_mismatch",
            Self::CrossTenant => "cross_tenant",
            Self::NotGranted => "not_granted",
            Self::NotCreator => "not_creator",
            Self::NotAssignee => "not_assignee",
            Self::RoleRestricted => "role_restricted",
            Self::ResourceTypeMismatch => "resource_type_mismatch",
        }
    }
}

pub(crate) fn evaluate(
    permission: Permission,
    ctx: &AuthorizationContext,
) -> std::result::Result<(), DenyReason> {
    let (actor, membership) = match tenancy::admit(ctx)? {
        Admission::Bypass => return Ok(()),
        Admission::Member { actor, membership } => (actor, membership),
    };

    if !RoleTable::global().grants(membership.role, permission) {
        return Err(DenyReason::NotGranted);
    }

    match &ctx.resource {
        None => Ok(()),
        Some(resource) => refiner::refine(permission, actor, membership.role, resource),
    }
}

/// Decide whether `permission` is allowed in `ctx`.
pub fn can(permission: Permission, ctx: &AuthorizationContext) -> bool {
    evaluate(permission, ctx).is_ok()
}

/// `true` if at least one permission is allowed. Stops at the first ALLOW.
///
/// An empty input is `false`.
pub fn can_any<I>(permissions: I, ctx: &AuthorizationContext) -> bool
where
    I: IntoIterator<Item = Permission>,
{
    permissions.into_iter().any(|p| can(p, ctx))
}

/// `true` if every permission is allowed. Stops at the first DENY.
///
/// An empty input is vacuously `true`.
pub fn can_all<I>(permissions: I, ctx: &AuthorizationContext) -> bool
where
    I: IntoIterator<Item = Permission>,
{
    permissions.into_iter().all(|p| can(p, ctx))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Decision
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny)
    }
}

impl From<bool> for Decision {
    fn from(allow: bool) -> Self {
        if allow {
            Self::Allow
        } else {
            Self::Deny
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Authorizer
// ═══════════════════════════════════════════════════════════════════════════════

/// Request-path facade over [`can`] that adds audit logging and metrics.
///
/// Holds only configuration; cloning is cheap and every clone behaves the same.
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    config: AuthzConfig,
}

impl Authorizer {
    pub fn new(config: AuthzConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthzConfig {
        &self.config
    }

    /// Evaluate one permission.
    pub fn check(&self, permission: Permission, ctx: &AuthorizationContext) -> Decision {
        let outcome = evaluate(permission, ctx);
        self.observe(permission, ctx, outcome);
        outcome.is_ok().into()
    }

    /// `Ok(())` if allowed; a reason-free `Forbidden` error otherwise.
    pub fn enforce(&self, permission: Permission, ctx: &AuthorizationContext) -> Result<()> {
        match self.check(permission, ctx) {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(TaskgateError::forbidden()),
        }
    }

    /// `Allow` if any permission is allowed. An empty slice is `Deny`.
    pub fn check_any(&self, permissions: &[Permission], ctx: &AuthorizationContext) -> Decision {
        permissions
            .iter()
            .any(|p| self.check(*p, ctx).is_allowed())
            .into()
    }

    /// `Allow` only if all permissions are allowed. An empty slice is `Allow`.
    pub fn check_all(&self, permissions: &[Permission], ctx: &AuthorizationContext) -> Decision {
        permissions
            .iter()
            .all(|p| self.check(*p, ctx).is_allowed())
            .into()
    }

    fn observe(
        &self,
        permission: Permission,
        ctx: &AuthorizationContext,
        outcome: std::result::Result<(), DenyReason>,
    ) {
        if self.config.record_metrics {
            DecisionMetrics::record(permission, outcome.err());
            if ctx.is_system() {
                DecisionMetrics::record_bypass(permission);
            }
        }

        let actor_id = ctx.actor().map(|a| a.id.as_str()).unwrap_or("system");
        let organization_id = ctx.organization_id().map(|o| o.as_str()).unwrap_or("-");

        if ctx.is_system() {
            info!(permission = %permission, "System principal bypassed authorization");
        }

        if outcome == Err(DenyReason::ResourceTypeMismatch) {
            warn!(
                permission = %permission,
                actor_id,
                resource_type = ctx.resource.as_ref().map_or("-", |r| r.resource_type.as_str()),
                "Identity-conditioned permission checked against mismatched resource type"
            );
        }

        if !self.config.audit_decisions {
            return;
        }

        match outcome {
            Ok(()) => debug!(
                permission = %permission,
                actor_id,
                organization_id,
                "Permission granted"
            ),
            Err(reason) => info!(
                permission = %permission,
                actor_id,
                organization_id,
                reason = reason.as_str(),
                "Permission denied"
            ),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::rbac::models::Role;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{self, Layer, SubscriberExt};

    fn member_of(org: &str, id: &str, role: Role) -> AuthorizationContext {
        AuthorizationContext::new(
            Actor::new(id, format!("{id}@example.com")).with_membership(org, role),
        )
    }

    #[test]
    fn test_owner_can_delete_organization() {
        let ctx = member_of("org-1", "alice", Role::Owner)
            .with_resource(ResourceDescriptor::organization("org-1"));
        assert!(can(Permission::OrganizationDelete, &ctx));
    }

    #[test]
    fn test_admin_cannot_delete_organization() {
        let ctx = member_of("org-1", "bob", Role::Admin)
            .with_resource(ResourceDescriptor::organization("org-1"));
        assert!(!can(Permission::OrganizationDelete, &ctx));
    }

    #[test]
    fn test_no_resource_uses_role_grant_only() {
        let ctx = member_of("org-1", "carol", Role::Member);
        assert!(can(Permission::TaskView, &ctx));
        assert!(can(Permission::TaskCreate, &ctx));
        assert!(!can(Permission::TaskDelete, &ctx));
        // Without a resource there is nothing to compare against; the grant stands.
        assert!(can(Permission::TaskUpdateOwn, &ctx));
    }

    #[test]
    fn test_refiner_cannot_grant_missing_permission() {
        let ctx = member_of("org-1", "carol", Role::Member)
            .with_resource(ResourceDescriptor::task("org-1").created_by("carol"));
        assert!(!can(Permission::TaskUpdate, &ctx));
        assert!(!can(Permission::TaskDelete, &ctx));
        assert_eq!(
            evaluate(Permission::TaskDelete, &ctx),
            Err(DenyReason::NotGranted)
        );
    }

    #[test]
    fn test_member_update_role_owner_only() {
        let resource = ResourceDescriptor::project("org-1");
        let owner = member_of("org-1", "o", Role::Owner).with_resource(resource.clone());
        let admin = member_of("org-1", "a", Role::Admin).with_resource(resource.clone());
        let member = member_of("org-1", "m", Role::Member).with_resource(resource);

        assert!(can(Permission::MemberUpdateRole, &owner));
        assert!(!can(Permission::MemberUpdateRole, &admin));
        assert!(!can(Permission::MemberUpdateRole, &member));
    }

    #[test]
    fn test_system_principal_allows_cross_tenant() {
        let ctx = AuthorizationContext::system()
            .with_resource(ResourceDescriptor::organization("org-anything"));
        assert!(ctx.is_system());
        assert!(ctx.actor().is_none());
        for perm in Permission::ALL {
            assert!(can(perm, &ctx), "{perm}");
        }
    }

    #[test]
    fn test_combinators() {
        let ctx = member_of("org-1", "m", Role::Member);

        let none: [Permission; 0] = [];
        assert!(!can_any(none, &ctx));
        assert!(can_all(none, &ctx));

        assert!(can_any([Permission::TaskDelete, Permission::TaskView], &ctx));
        assert!(!can_any([Permission::TaskDelete, Permission::ProjectDelete], &ctx));

        assert!(can_all([Permission::TaskView, Permission::TaskCreate], &ctx));
        assert!(!can_all([Permission::TaskView, Permission::TaskDelete], &ctx));
    }

    #[test]
    fn test_decision_from_bool() {
        assert_eq!(Decision::from(true), Decision::Allow);
        assert!(Decision::from(false).is_denied());
    }

    #[test]
    fn test_authorizer_matches_can() {
        let authorizer = Authorizer::default();
        let ctx = member_of("org-1", "u1", Role::Member)
            .with_resource(ResourceDescriptor::task("org-1").created_by("u2"));

        for perm in Permission::ALL {
            assert_eq!(
                authorizer.check(perm, &ctx).is_allowed(),
                can(perm, &ctx),
                "{perm}"
            );
        }
    }

    #[test]
    fn test_enforce() {
        let authorizer = Authorizer::new(AuthzConfig {
            audit_decisions: false,
            record_metrics: false,
        });
        let ctx = member_of("org-1", "u1", Role::Member);

        assert!(authorizer.enforce(Permission::ProjectView, &ctx).is_ok());

        let err = authorizer
            .enforce(Permission::ProjectDelete, &ctx)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.http_status(), 403);
    }

    struct EventCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for EventCounter {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: layer::Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn count_events(f: impl FnOnce()) -> usize {
        let events = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(EventCounter(events.clone()));
        tracing::subscriber::with_default(subscriber, f);
        events.load(Ordering::SeqCst)
    }

    #[test]
    fn test_can_emits_no_events() {
        let system = AuthorizationContext::system().with_resource(ResourceDescriptor::task("org-9"));
        let mismatched = member_of("org-1", "u1", Role::Member)
            .with_resource(ResourceDescriptor::project("org-1").created_by("u1"));

        let emitted = count_events(|| {
            assert!(can_all(Permission::ALL, &system));
            assert!(!can(Permission::TaskUpdateOwn, &mismatched));
        });
        assert_eq!(emitted, 0);
    }

    #[test]
    fn test_authorizer_logs_bypass_and_type_mismatch() {
        let authorizer = Authorizer::new(AuthzConfig {
            audit_decisions: false,
            record_metrics: false,
        });
        let system = AuthorizationContext::system();
        let mismatched = member_of("org-1", "u1", Role::Member)
            .with_resource(ResourceDescriptor::project("org-1").created_by("u1"));

        assert_eq!(
            count_events(|| {
                authorizer.check(Permission::OrganizationDelete, &system);
            }),
            1
        );
        assert_eq!(
            count_events(|| {
                authorizer.check(Permission::TaskUpdateOwn, &mismatched);
            }),
            1
        );
        assert_eq!(
            count_events(|| {
                authorizer.check(Permission::TaskView, &mismatched);
            }),
            0
        );
    }

    #[test]
    fn test_authorizer_combinators() {
        let authorizer = Authorizer::default();
        let ctx = member_of("org-1", "u1", Role::Admin);

        assert!(authorizer.check_any(&[], &ctx).is_denied());
        assert!(authorizer.check_all(&[], &ctx).is_allowed());
        assert!(authorizer
            .check_any(&[Permission::OrganizationDelete, Permission::ProjectDelete], &ctx)
            .is_allowed());
        assert!(authorizer
            .check_all(&[Permission::ProjectDelete, Permission::OrganizationDelete], &ctx)
            .is_denied());
    }
}
