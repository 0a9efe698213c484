//! Configuration validation checks.
//!
//! Each module holds pure checks over a parsed draft. Checks never stop
//! each other: every registered check runs and findings keep check order.

mod formats;
mod intervals;
mod locations;
mod mapping;
mod models;
mod periods;
mod sources;
mod targets;
mod time;

use hub_model::{ConfigIssue, ValidationReport};

use crate::context::ValidationContext;
use crate::draft::ConfigDraft;

/// Signature shared by every registered check.
pub type Check = fn(&ConfigDraft, &ValidationContext) -> Vec<ConfigIssue>;

/// Registered checks in evaluation order.
pub const CHECKS: &[(&str, Check)] = &[
    ("parse", parse_findings),
    ("data_source", sources::check),
    ("forecast_periods", periods::check),
    ("special_forecast_periods", periods::check_dynamic),
    ("locations", locations::check),
    ("targets", targets::check),
    ("time_unit", time::check_time_unit),
    ("horizons", time::check_horizons),
    ("column_mapping", mapping::check),
    ("formats", formats::check),
    ("models", models::check),
    ("prediction_intervals", intervals::check),
    ("baseline_model", models::check_baseline),
    ("target_periods", targets::check_period_references),
];

/// Run all registered checks on a draft.
pub fn run_all(draft: &ConfigDraft, ctx: &ValidationContext) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (name, check) in CHECKS {
        let issues = check(draft, ctx);
        if !issues.is_empty() {
            tracing::debug!(check = %name, issue_count = issues.len(), "check reported findings");
        }
        report.extend(issues);
    }
    report
}

/// Findings raised while reading the document into a draft.
fn parse_findings(draft: &ConfigDraft, _ctx: &ValidationContext) -> Vec<ConfigIssue> {
    draft.parse_issues.clone()
}
