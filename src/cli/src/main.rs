//! Taskgate CLI - inspect the permission catalog and evaluate authorization decisions.
//!
//! Provides commands for listing permissions and roles, and for checking
//! single or batched decision requests.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check, eval, permissions, roles};
use output::OutputFormat;
use taskgate_core::config::Config;
use taskgate_core::rbac::Authorizer;
use taskgate_core::telemetry::{init_telemetry, LoggingConfig, TelemetryConfig};

/// Exit status when a decision (or any decision in a batch) is DENY.
const EXIT_DENIED: i32 = 2;

/// Taskgate - multi-tenant authorization
#[derive(Parser)]
#[command(
    name = "taskgate",
    author = "Aezi <aezi.zhu@icloud.com>",
    version,
    about = "Taskgate - multi-tenant authorization",
    long_about = "CLI tool for inspecting the Taskgate permission catalog and evaluating authorization decisions.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "TASKGATE_CONFIG")]
    config: Option<String>,

    /// Log decisions to stderr at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the permission catalog with per-role grants
    Permissions(permissions::PermissionsArgs),

    /// List roles or show one role's permission set
    Roles(roles::RolesArgs),

    /// Evaluate a single decision from flags
    Check(check::CheckArgs),

    /// Evaluate decision requests from a JSON file or stdin
    Eval(eval::EvalArgs),
}

fn load_config(path: Option<&str>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

fn init(cli: &Cli, config: &Config) -> Result<()> {
    let mut telemetry = TelemetryConfig::from_observability("taskgate-cli", &config.observability);
    telemetry.logging = LoggingConfig {
        stderr: true,
        include_target: false,
        ..telemetry.logging
    };
    if cli.verbose {
        telemetry.logging.level = "debug".to_string();
    }
    init_telemetry(&telemetry)
}

fn run(cli: Cli) -> Result<bool> {
    let config = load_config(cli.config.as_deref())?;
    init(&cli, &config)?;
    tracing::debug!(
        audit_decisions = config.authz.audit_decisions,
        record_metrics = config.authz.record_metrics,
        "Configuration loaded"
    );

    let authorizer = Authorizer::new(config.authz.clone());
    let format = cli.output;

    match cli.command {
        Commands::Permissions(args) => permissions::execute(args, format).map(|_| true),
        Commands::Roles(args) => roles::execute(args, format).map(|_| true),
        Commands::Check(args) => check::execute(args, &authorizer, format),
        Commands::Eval(args) => eval::execute(args, &authorizer, format),
    }
}

/// 0 when allowed, [`EXIT_DENIED`] on any DENY, 1 on error.
fn exit_status(outcome: &Result<bool>) -> i32 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => EXIT_DENIED,
        Err(_) => 1,
    }
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let outcome = run(cli);
    if let Err(e) = &outcome {
        output::print_error(&format!("{:#}", e));
    }

    let status = exit_status(&outcome);
    if status != 0 {
        std::process::exit(status);
    }
}
