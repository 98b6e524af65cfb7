//! Decision metrics through the `metrics` facade.
//!
//! The library never installs a recorder. When the host process has one
//! (Prometheus or otherwise), these counters show up there; otherwise every
//! call is a no-op.
//!
//! # Example
//!
//! ```rust,ignore
//! use taskgate_core::telemetry::metrics::DecisionMetrics;
//!
//! DecisionMetrics::describe();
//! ```

use metrics::{counter, describe_counter};
use std::sync::Once;

use crate::rbac::policy::DenyReason;
use crate::rbac::Permission;

/// Counter incremented once per decision made through `Authorizer`.
pub const DECISIONS_TOTAL: &str = "taskgate_authz_decisions_total";

/// Counter incremented once per system-principal bypass.
pub const BYPASS_TOTAL: &str = "taskgate_authz_bypass_total";

static DESCRIBED: Once = Once::new();

/// Metrics for authorization decisions.
pub struct DecisionMetrics;

impl DecisionMetrics {
    /// Register metric descriptions with the installed recorder. Idempotent.
    pub fn describe() {
        DESCRIBED.call_once(|| {
            describe_counter!(
                DECISIONS_TOTAL,
                "Authorization decisions by permission, outcome and deny reason"
            );
            describe_counter!(BYPASS_TOTAL, "Decisions allowed through the system principal");
        });
    }

    pub(crate) fn record(permission: Permission, denied: Option<DenyReason>) {
        Self::describe();

        let (outcome, reason) = match denied {
            None => ("allow", "none"),
            Some(reason) => ("deny", reason.as_str()),
        };

        counter!(
            DECISIONS_TOTAL,
            "permission" => permission.as_str(),
            "outcome" => outcome,
            "reason" => reason,
        )
        .increment(1);
    }

    pub(crate) fn record_bypass(permission: Permission) {
        Self::describe();
        counter!(BYPASS_TOTAL, "permission" => permission.as_str()).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder_is_noop() {
        DecisionMetrics::describe();
        DecisionMetrics::describe();
        DecisionMetrics::record(Permission::TaskView, None);
        DecisionMetrics::record(Permission::TaskDelete, Some(DenyReason::NotGranted));
        DecisionMetrics::record_bypass(Permission::OrganizationDelete);
    }
}
