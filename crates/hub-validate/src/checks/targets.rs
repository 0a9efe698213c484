use hub_model::ConfigIssue;

use crate::context::ValidationContext;
use crate::draft::{ConfigDraft, TARGETS};

pub fn check(draft: &ConfigDraft, _ctx: &ValidationContext) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    if draft.targets.is_empty() {
        issues.push(ConfigIssue::error(
            TARGETS,
            "At least one target must be defined",
        ));
        return issues;
    }

    let mut seen: Vec<&str> = Vec::new();
    let mut reported: Vec<&str> = Vec::new();
    for target in &draft.targets {
        let key = target.target_column_in_target_data.as_str();
        if seen.contains(&key) && !reported.contains(&key) {
            issues.push(ConfigIssue::error(
                TARGETS,
                format!("Duplicate target '{key}'"),
            ));
            reported.push(key);
        }
        seen.push(key);

        if target.forecast_periods.is_none() {
            issues.push(ConfigIssue::warning(
                TARGETS,
                format!(
                    "Target '{key}' missing 'for_forecast_periods', defaulting to all available periods"
                ),
            ));
        }
    }
    issues
}

/// Every period id a target lists must be defined.
pub fn check_period_references(draft: &ConfigDraft, _ctx: &ValidationContext) -> Vec<ConfigIssue> {
    let known = draft.all_period_ids();
    let mut issues = Vec::new();
    for target in &draft.targets {
        let Some(period_ids) = &target.forecast_periods else {
            continue;
        };
        for period_id in period_ids {
            if !known.contains(&period_id.as_str()) {
                issues.push(ConfigIssue::error(
                    TARGETS,
                    format!(
                        "Target '{}' references undefined forecast period: '{period_id}'",
                        target.target_column_in_target_data
                    ),
                ));
            }
        }
    }
    issues
}
