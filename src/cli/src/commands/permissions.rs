//! Permission catalog listing.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use taskgate_core::rbac::{Namespace, Permission, Role};

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct PermissionsArgs {
    /// Only show permissions in this namespace (e.g. task, comment)
    #[arg(short, long)]
    namespace: Option<Namespace>,
}

#[derive(Debug, Serialize, Tabled)]
struct PermissionRow {
    #[tabled(rename = "Permission")]
    permission: &'static str,
    #[tabled(rename = "Namespace")]
    namespace: &'static str,
    #[tabled(rename = "Qualifier")]
    qualifier: &'static str,
    #[tabled(rename = "Owner")]
    owner: bool,
    #[tabled(rename = "Admin")]
    admin: bool,
    #[tabled(rename = "Member")]
    member: bool,
}

impl From<Permission> for PermissionRow {
    fn from(p: Permission) -> Self {
        Self {
            permission: p.as_str(),
            namespace: p.namespace().as_str(),
            qualifier: p.qualifier().map_or("-", |q| q.as_str()),
            owner: Role::Owner.grants(p),
            admin: Role::Admin.grants(p),
            member: Role::Member.grants(p),
        }
    }
}

fn catalog_rows(namespace: Option<Namespace>) -> Vec<PermissionRow> {
    Permission::ALL
        .into_iter()
        .filter(|p| namespace.map_or(true, |ns| p.namespace() == ns))
        .map(PermissionRow::from)
        .collect()
}

pub fn execute(args: PermissionsArgs, format: OutputFormat) -> Result<()> {
    output::print_list(&catalog_rows(args.namespace), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_rows_filtered_by_namespace() {
        assert_eq!(catalog_rows(None).len(), Permission::ALL.len());

        let comments = catalog_rows(Some(Namespace::Comment));
        assert_eq!(comments.len(), 6);
        assert!(comments.iter().all(|row| row.namespace == "comment"));

        let own = comments
            .iter()
            .find(|row| row.permission == "comment.update.own")
            .unwrap();
        assert_eq!(own.qualifier, "own");
        assert!(own.member && own.admin && own.owner);
    }
}
