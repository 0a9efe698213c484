//! Forecast period checks (static and dynamic).

use hub_model::ConfigIssue;

use crate::context::ValidationContext;
use crate::draft::{ConfigDraft, FORECAST_PERIODS, Field, SPECIAL_FORECAST_PERIODS};

/// Static period rules plus uniqueness across static and dynamic periods.
pub fn check(draft: &ConfigDraft, _ctx: &ValidationContext) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if draft.static_periods.is_empty() && draft.dynamic_periods.is_empty() {
        issues.push(ConfigIssue::error(
            FORECAST_PERIODS,
            "At least one forecast period must be defined",
        ));
        return issues;
    }

    // (period_id, sections defining it) in first-seen order
    let mut definitions: Vec<(&str, Vec<&str>)> = Vec::new();
    let declared = draft
        .static_periods
        .iter()
        .map(|period| (period.period_id.as_str(), FORECAST_PERIODS))
        .chain(
            draft
                .dynamic_periods
                .iter()
                .map(|period| (period.period_id.as_str(), SPECIAL_FORECAST_PERIODS)),
        );
    for (period_id, section) in declared {
        match definitions.iter_mut().find(|(id, _)| *id == period_id) {
            Some((_, sections)) => sections.push(section),
            None => definitions.push((period_id, vec![section])),
        }
    }
    for (period_id, sections) in &definitions {
        if sections.len() > 1 {
            let mut named: Vec<&str> = sections.clone();
            named.dedup();
            issues.push(ConfigIssue::error(
                FORECAST_PERIODS,
                format!(
                    "Duplicate period_id '{period_id}' is defined {} times (in {})",
                    sections.len(),
                    named.join(", ")
                ),
            ));
        }
    }

    let mut seen_display: Vec<&str> = Vec::new();
    let displays = draft
        .static_periods
        .iter()
        .map(|period| (period.period_id.as_str(), period.display_string.as_str()))
        .chain(
            draft
                .dynamic_periods
                .iter()
                .map(|period| (period.period_id.as_str(), period.display_string.as_str())),
        );
    for (period_id, display) in displays {
        if seen_display.contains(&display) {
            issues.push(ConfigIssue::warning(
                FORECAST_PERIODS,
                format!("Duplicate display_string '{display}' (period: {period_id})"),
            ));
        }
        seen_display.push(display);
    }

    for period in &draft.static_periods {
        if period.start_date > period.end_date {
            issues.push(ConfigIssue::error(
                FORECAST_PERIODS,
                format!(
                    "start_date is after end_date for period '{}' ({} > {})",
                    period.period_id, period.start_date, period.end_date
                ),
            ));
        }
    }

    let defaults: Vec<&str> = draft
        .static_periods
        .iter()
        .filter(|period| period.is_default_selected)
        .map(|period| period.period_id.as_str())
        .collect();
    if defaults.len() > 1 {
        issues.push(ConfigIssue::error(
            FORECAST_PERIODS,
            format!(
                "Only one forecast period can be set as default. Found: {}",
                defaults.join(", ")
            ),
        ));
    }

    issues
}

/// Time-anchor rules for dynamic periods.
pub fn check_dynamic(draft: &ConfigDraft, ctx: &ValidationContext) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let error = |message: String| ConfigIssue::error(SPECIAL_FORECAST_PERIODS, message);

    for period in &draft.dynamic_periods {
        let id = &period.period_id;
        let Some(anchor) = &period.time_anchor else {
            issues.push(error(format!(
                "Special period '{id}' is missing 'time_anchor'"
            )));
            continue;
        };

        match &anchor.range_calculation {
            Field::Missing => issues.push(error(format!(
                "Special period '{id}' is missing 'range_calculation' inside 'time_anchor'"
            ))),
            Field::Invalid(raw) => issues.push(error(format!(
                "Special period '{id}' 'range_calculation' must be an integer (got {raw})"
            ))),
            Field::Valid(range) if *range > 0 => issues.push(error(format!(
                "Special period '{id}' must have a zero or negative 'range_calculation' to look backward in time (got {range})"
            ))),
            Field::Valid(_) => {}
        }

        if anchor.anchor_mode.valid().is_none() {
            issues.push(error(format!(
                "Special period '{id}' has invalid 'anchor_mode'. Must be 'target-data' or 'model-output'"
            )));
        }

        let Some(anchor_on) = &anchor.anchor_on else {
            issues.push(error(format!(
                "Special period '{id}' is missing 'anchor_on' inside 'time_anchor'"
            )));
            continue;
        };
        match draft.static_period(anchor_on) {
            None => issues.push(error(format!(
                "Special period '{id}' anchors on an undefined forecast period '{anchor_on}'"
            ))),
            Some(anchor_period) if anchor_period.end_date <= ctx.today => {
                issues.push(ConfigIssue::warning(
                    SPECIAL_FORECAST_PERIODS,
                    format!(
                        "Special period '{id}' is anchored to forecast period '{anchor_on}' which ended on {}. It will not update",
                        anchor_period.end_date
                    ),
                ));
            }
            Some(_) => {}
        }
    }

    issues
}
