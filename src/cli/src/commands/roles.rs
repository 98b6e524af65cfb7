//! Role listing and per-role permission sets.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use taskgate_core::rbac::{Role, RoleTable};

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct RolesArgs {
    /// Show the permission set of a single role (OWNER, ADMIN, MEMBER)
    #[arg(short, long)]
    role: Option<Role>,
}

#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    #[tabled(rename = "Role")]
    role: Role,
    #[tabled(rename = "Permissions")]
    permissions: usize,
    #[tabled(rename = "Description")]
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct RoleDetail {
    role: Role,
    description: &'static str,
    permissions: Vec<&'static str>,
}

#[derive(Debug, Serialize, Tabled)]
struct GrantRow {
    #[tabled(rename = "Permission")]
    permission: &'static str,
}

pub fn execute(args: RolesArgs, format: OutputFormat) -> Result<()> {
    let table = RoleTable::global();

    match args.role {
        None => {
            let rows: Vec<RoleRow> = Role::ALL
                .into_iter()
                .map(|role| RoleRow {
                    role,
                    permissions: table.permissions(role).len(),
                    description: role.description(),
                })
                .collect();
            output::print_list(&rows, format)
        }
        Some(role) => {
            let permissions: Vec<&'static str> = table
                .sorted_permissions(role)
                .into_iter()
                .map(|p| p.as_str())
                .collect();

            match format {
                OutputFormat::Table => {
                    output::print_header(&format!("{} - {}", role, role.description()));
                    let rows: Vec<GrantRow> = permissions
                        .into_iter()
                        .map(|permission| GrantRow { permission })
                        .collect();
                    output::print_list(&rows, format)
                }
                _ => output::print_item(
                    &RoleDetail {
                        role,
                        description: role.description(),
                        permissions,
                    },
                    format,
                ),
            }
        }
    }
}
