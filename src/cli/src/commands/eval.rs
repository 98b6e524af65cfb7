//! Batch decisions from a JSON file or stdin.
//!
//! Accepts a single `DecisionRequest` object or an array of them.

use std::io::Read;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use taskgate_core::rbac::{Authorizer, DecisionRequest};

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct EvalArgs {
    /// Path to a JSON request file, or `-` for stdin
    input: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RequestBatch {
    Many(Vec<DecisionRequest>),
    One(DecisionRequest),
}

impl RequestBatch {
    fn into_vec(self) -> Vec<DecisionRequest> {
        match self {
            Self::Many(requests) => requests,
            Self::One(request) => vec![request],
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct EvalRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Permission")]
    permission: String,
    #[tabled(rename = "Actor")]
    actor: String,
    #[tabled(rename = "Decision")]
    decision: String,
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

fn parse_batch(raw: &str) -> Result<Vec<DecisionRequest>> {
    let batch: RequestBatch =
        serde_json::from_str(raw).context("Input is not a decision request or an array of them")?;
    Ok(batch.into_vec())
}

/// Evaluate every request. Malformed requests are reported as `error` rows.
///
/// Returns whether every request was allowed.
pub fn execute(args: EvalArgs, authorizer: &Authorizer, format: OutputFormat) -> Result<bool> {
    let requests = parse_batch(&read_input(&args.input)?)?;

    let mut all_allowed = true;
    let rows: Vec<EvalRow> = requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            let decision = match request.to_context() {
                Ok((permission, ctx)) => {
                    if authorizer.check(permission, &ctx).is_allowed() {
                        "allow".to_string()
                    } else {
                        all_allowed = false;
                        "deny".to_string()
                    }
                }
                Err(e) => {
                    all_allowed = false;
                    format!("error: {}", e)
                }
            };
            EvalRow {
                index,
                permission: request.permission.clone(),
                actor: request.actor_id.clone(),
                decision,
            }
        })
        .collect();

    output::print_list(&rows, format)?;
    Ok(all_allowed)
}
