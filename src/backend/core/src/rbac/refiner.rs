//! Resource-scoped refinement of an already role-granted permission.
//!
//! This is a fixed dispatch table, not a rule engine. It can only narrow a
//! grant: the role table has already said yes by the time we get here.
//!
//! | Permission                                   | Allowed when                 |
//! |----------------------------------------------|------------------------------|
//! | `task.update.own`, `comment.update.own`,     | `resource.creator == actor`  |
//! | `comment.delete.own`, `attachment.delete.own`|                              |
//! | `task.update.assigned`                       | `resource.assignee == actor` |
//! | `member.remove`                              | role is ADMIN or OWNER       |
//! | `member.update_role`                         | role is OWNER                |
//! | anything else                                | always                       |
//!
//! An identity-conditioned permission checked against a resource of another
//! namespace is a caller bug and is refused outright.

use super::models::{Actor, ResourceDescriptor, Role};
use super::permission::Permission;
use super::policy::DenyReason;

pub(crate) fn refine(
    permission: Permission,
    actor: &Actor,
    role: Role,
    resource: &ResourceDescriptor,
) -> Result<(), DenyReason> {
    if permission.is_identity_conditioned()
        && !resource.resource_type.matches_namespace(permission.namespace())
    {
        return Err(DenyReason::ResourceTypeMismatch);
    }

    match permission {
        Permission::TaskUpdateOwn
        | Permission::CommentUpdateOwn
        | Permission::CommentDeleteOwn
        | Permission::AttachmentDeleteOwn => {
            if resource.is_created_by(&actor.id) {
                Ok(())
            } else {
                Err(DenyReason::NotCreator)
            }
        }
        Permission::TaskUpdateAssigned => {
            if resource.is_assigned_to(&actor.id) {
                Ok(())
            } else {
                Err(DenyReason::NotAssignee)
            }
        }
        Permission::MemberRemove => {
            if role != Role::Member {
                Ok(())
            } else {
                Err(DenyReason::RoleRestricted)
            }
        }
        // Role escalation is never delegated below OWNER.
        Permission::MemberUpdateRole => {
            if role == Role::Owner {
                Ok(())
            } else {
                Err(DenyReason::RoleRestricted)
            }
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor::new("u1", "u1@example.com")
    }

    #[test]
    fn test_own_permissions_require_creator() {
        let mine = ResourceDescriptor::comment("org-1").created_by("u1");
        let theirs = ResourceDescriptor::comment("org-1").created_by("u2");
        let unknown = ResourceDescriptor::comment("org-1");

        for perm in [Permission::CommentUpdateOwn, Permission::CommentDeleteOwn] {
            assert!(refine(perm, &actor(), Role::Member, &mine).is_ok());
            assert_eq!(
                refine(perm, &actor(), Role::Member, &theirs),
                Err(DenyReason::NotCreator)
            );
            assert_eq!(
                refine(perm, &actor(), Role::Owner, &unknown),
                Err(DenyReason::NotCreator)
            );
        }
    }

    #[test]
    fn test_assigned_requires_assignee() {
        let assigned = ResourceDescriptor::task("org-1").assigned_to("u1");
        let created = ResourceDescriptor::task("org-1").created_by("u1");

        assert!(refine(Permission::TaskUpdateAssigned, &actor(), Role::Member, &assigned).is_ok());
        assert_eq!(
            refine(Permission::TaskUpdateAssigned, &actor(), Role::Member, &created),
            Err(DenyReason::NotAssignee)
        );
    }

    #[test]
    fn test_member_management_role_gates() {
        let org = ResourceDescriptor::organization("org-1");

        assert!(refine(Permission::MemberRemove, &actor(), Role::Admin, &org).is_ok());
        assert!(refine(Permission::MemberRemove, &actor(), Role::Owner, &org).is_ok());
        assert_eq!(
            refine(Permission::MemberRemove, &actor(), Role::Member, &org),
            Err(DenyReason::RoleRestricted)
        );

        assert!(refine(Permission::MemberUpdateRole, &actor(), Role::Owner, &org).is_ok());
        assert_eq!(
            refine(Permission::MemberUpdateRole, &actor(), Role::Admin, &org),
            Err(DenyReason::RoleRestricted)
        );
    }

    #[test]
    fn test_member_permissions_accept_any_anchor() {
        let task = ResourceDescriptor::task("org-1");
        assert!(refine(Permission::MemberUpdateRole, &actor(), Role::Owner, &task).is_ok());
    }

    #[test]
    fn test_unconditional_permissions_pass_through() {
        let project = ResourceDescriptor::project("org-1");
        assert!(refine(Permission::TaskCreate, &actor(), Role::Member, &project).is_ok());
        assert!(refine(Permission::OrganizationDelete, &actor(), Role::Owner, &project).is_ok());
    }

    #[test]
    fn test_mismatched_resource_type_denied() {
        let project = ResourceDescriptor::project("org-1").created_by("u1");
        assert_eq!(
            refine(Permission::TaskUpdateOwn, &actor(), Role::Owner, &project),
            Err(DenyReason::ResourceTypeMismatch)
        );
    }
}
