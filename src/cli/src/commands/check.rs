//! Single decision from command-line flags.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use taskgate_core::rbac::{AuthorizationContext, Authorizer, DecisionRequest, Permission, Role};

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct CheckArgs {
    /// Permission token, e.g. task.update.own
    #[arg(short, long)]
    permission: Permission,

    /// Acting user id
    #[arg(short, long)]
    actor: String,

    /// Acting user email
    #[arg(long)]
    email: Option<String>,

    /// Organization the actor is a member of
    #[arg(long, requires = "role")]
    org: Option<String>,

    /// Actor's role in --org (OWNER, ADMIN, MEMBER)
    #[arg(short, long, requires = "org")]
    role: Option<Role>,

    /// Target resource type (organization, project, task, comment, attachment)
    #[arg(long, requires = "resource_org")]
    resource_type: Option<String>,

    /// Organization owning the target resource
    #[arg(long, requires = "resource_type")]
    resource_org: Option<String>,

    /// User who created the target resource
    #[arg(long, requires = "resource_type")]
    creator: Option<String>,

    /// User assigned to the target resource
    #[arg(long, requires = "resource_type")]
    assignee: Option<String>,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    permission: &'a str,
    actor: &'a str,
    allow: bool,
}

impl CheckArgs {
    fn to_request(&self) -> DecisionRequest {
        let mut request = DecisionRequest::new(self.permission, self.actor.as_str());
        request.actor_email = self.email.clone();
        request.organization_id = self.org.clone();
        request.role = self.role.map(|r| r.as_str().to_string());
        request.resource_type = self.resource_type.clone();
        request.resource_organization_id = self.resource_org.clone();
        request.resource_creator_id = self.creator.clone();
        request.resource_assignee_id = self.assignee.clone();
        request
    }
}

/// Returns whether the permission was allowed.
pub fn execute(args: CheckArgs, authorizer: &Authorizer, format: OutputFormat) -> Result<bool> {
    let (permission, ctx): (Permission, AuthorizationContext) = args.to_request().to_context()?;
    let allow = authorizer.check(permission, &ctx).is_allowed();

    match format {
        OutputFormat::Table => {
            let msg = format!("{} for {}", permission, args.actor);
            if allow {
                output::print_allow(&msg);
            } else {
                output::print_deny(&msg);
            }
        }
        _ => output::print_item(
            &CheckOutput {
                permission: permission.as_str(),
                actor: &args.actor,
                allow,
            },
            format,
        )?,
    }

    Ok(allow)
}
