//! The role-permission table.
//!
//! Taskgate ships with three fixed roles:
//!
//! | Role   | Description                                                             |
//! |--------|-------------------------------------------------------------------------|
//! | OWNER  | Full catalog, including organization deletion and member role changes  |
//! | ADMIN  | Project/task/comment/attachment CRUD, member invite and removal        |
//! | MEMBER | View access, task creation, own/assigned task updates, own comments    |
//!
//! The table is closed: a permission absent from a role's set is denied for
//! that role. It is built once per process and never mutated.

use std::collections::HashSet;
use std::sync::OnceLock;

use super::models::Role;
use super::permission::Permission;

static ROLE_TABLE: OnceLock<RoleTable> = OnceLock::new();

const MEMBER_GRANTS: &[Permission] = &[
    Permission::OrganizationView,
    Permission::MemberView,
    Permission::ProjectView,
    Permission::TaskView,
    Permission::TaskCreate,
    Permission::TaskUpdateOwn,
    Permission::TaskUpdateAssigned,
    Permission::CommentView,
    Permission::CommentCreate,
    Permission::CommentUpdateOwn,
    Permission::CommentDeleteOwn,
    Permission::AttachmentView,
    Permission::AttachmentCreate,
    Permission::AttachmentDeleteOwn,
];

// Granted to ADMIN on top of everything MEMBER holds.
const ADMIN_EXTRA_GRANTS: &[Permission] = &[
    Permission::MemberInvite,
    Permission::MemberRemove,
    Permission::ProjectCreate,
    Permission::ProjectUpdate,
    Permission::ProjectDelete,
    Permission::TaskUpdate,
    Permission::TaskDelete,
    Permission::CommentUpdate,
    Permission::CommentDelete,
    Permission::AttachmentDelete,
];

/// Total mapping from [`Role`] to its unconditionally granted permissions.
#[derive(Debug, Clone)]
pub struct RoleTable {
    owner: HashSet<Permission>,
    admin: HashSet<Permission>,
    member: HashSet<Permission>,
}

impl RoleTable {
    /// Build the table from the fixed grant lists.
    pub fn new() -> Self {
        let member: HashSet<Permission> = MEMBER_GRANTS.iter().copied().collect();

        let mut admin = member.clone();
        admin.extend(ADMIN_EXTRA_GRANTS.iter().copied());

        let owner: HashSet<Permission> = Permission::ALL.iter().copied().collect();

        Self {
            owner,
            admin,
            member,
        }
    }

    /// The process-wide table, initialized on first use.
    pub fn global() -> &'static RoleTable {
        ROLE_TABLE.get_or_init(RoleTable::new)
    }

    /// The permission set granted to `role`.
    pub fn permissions(&self, role: Role) -> &HashSet<Permission> {
        match role {
            Role::Owner => &self.owner,
            Role::Admin => &self.admin,
            Role::Member => &self.member,
        }
    }

    /// Whether `role` is granted `permission` before any resource refinement.
    pub fn grants(&self, role: Role, permission: Permission) -> bool {
        self.permissions(role).contains(&permission)
    }

    /// Permissions granted to `role`, sorted in catalog order.
    pub fn sorted_permissions(&self, role: Role) -> Vec<Permission> {
        let mut perms: Vec<Permission> = self.permissions(role).iter().copied().collect();
        perms.sort();
        perms
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Role {
    /// Shorthand for a lookup in the global [`RoleTable`].
    pub fn grants(self, permission: Permission) -> bool {
        RoleTable::global().grants(self, permission)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_has_full_catalog() {
        let table = RoleTable::new();
        for perm in Permission::ALL {
            assert!(table.grants(Role::Owner, perm), "{perm}");
        }
        assert_eq!(table.permissions(Role::Owner).len(), Permission::ALL.len());
    }

    #[test]
    fn test_admin_permissions() {
        let table = RoleTable::new();
        assert!(table.grants(Role::Admin, Permission::ProjectDelete));
        assert!(table.grants(Role::Admin, Permission::TaskUpdate));
        assert!(table.grants(Role::Admin, Permission::CommentDelete));
        assert!(table.grants(Role::Admin, Permission::AttachmentDelete));
        assert!(table.grants(Role::Admin, Permission::MemberInvite));
        assert!(table.grants(Role::Admin, Permission::MemberRemove));

        assert!(!table.grants(Role::Admin, Permission::OrganizationDelete));
        assert!(!table.grants(Role::Admin, Permission::OrganizationUpdate));
        assert!(!table.grants(Role::Admin, Permission::MemberUpdateRole));
    }

    #[test]
    fn test_member_permissions() {
        let table = RoleTable::new();
        assert!(table.grants(Role::Member, Permission::OrganizationView));
        assert!(table.grants(Role::Member, Permission::ProjectView));
        assert!(table.grants(Role::Member, Permission::TaskCreate));
        assert!(table.grants(Role::Member, Permission::TaskUpdateOwn));
        assert!(table.grants(Role::Member, Permission::TaskUpdateAssigned));
        assert!(table.grants(Role::Member, Permission::CommentCreate));
        assert!(table.grants(Role::Member, Permission::AttachmentDeleteOwn));

        assert!(!table.grants(Role::Member, Permission::TaskUpdate));
        assert!(!table.grants(Role::Member, Permission::TaskDelete));
        assert!(!table.grants(Role::Member, Permission::ProjectCreate));
        assert!(!table.grants(Role::Member, Permission::CommentDelete));
        assert!(!table.grants(Role::Member, Permission::MemberInvite));
        assert!(!table.grants(Role::Member, Permission::MemberRemove));
        assert!(!table.grants(Role::Member, Permission::MemberUpdateRole));
    }

    #[test]
    fn test_role_breadth() {
        let table = RoleTable::new();
        let member = table.permissions(Role::Member);
        let admin = table.permissions(Role::Admin);
        let owner = table.permissions(Role::Owner);

        assert!(member.is_subset(admin));
        assert!(admin.is_subset(owner));
    }

    #[test]
    fn test_global_table_is_shared() {
        let a = RoleTable::global() as *const RoleTable;
        let b = RoleTable::global() as *const RoleTable;
        assert_eq!(a, b);
        assert!(Role::Owner.grants(Permission::OrganizationDelete));
        assert!(!Role::Admin.grants(Permission::OrganizationDelete));
    }

    #[test]
    fn test_sorted_permissions_follow_catalog_order() {
        let perms = RoleTable::new().sorted_permissions(Role::Owner);
        assert_eq!(perms, Permission::ALL.to_vec());
    }
}
