use hub_model::ConfigIssue;

use crate::context::ValidationContext;
use crate::draft::{ConfigDraft, Field, HORIZONS, TIME_UNIT};

/// Steps longer than two weeks are legal but unusual for forecasting hubs.
const LARGE_TIME_UNIT_DAYS: i64 = 14;

pub fn check_time_unit(draft: &ConfigDraft, _ctx: &ValidationContext) -> Vec<ConfigIssue> {
    match &draft.time_unit {
        Field::Missing => vec![ConfigIssue::error(
            TIME_UNIT,
            "time_unit is required in config",
        )],
        Field::Invalid(raw) => vec![ConfigIssue::error(
            TIME_UNIT,
            format!("time_unit must be an integer number of days (got {raw})"),
        )],
        Field::Valid(days) if *days < 1 => vec![ConfigIssue::error(
            TIME_UNIT,
            format!("time_unit must be at least 1 day (got {days})"),
        )],
        Field::Valid(days) if *days > LARGE_TIME_UNIT_DAYS => vec![ConfigIssue::warning(
            TIME_UNIT,
            format!(
                "time_unit is {days} days, which is unusually large. \
                 Most forecasting hubs use 7 days (weekly) or 1 day (daily)"
            ),
        )],
        Field::Valid(_) => Vec::new(),
    }
}

pub fn check_horizons(draft: &ConfigDraft, _ctx: &ValidationContext) -> Vec<ConfigIssue> {
    match &draft.horizons {
        Field::Missing => vec![ConfigIssue::error(
            HORIZONS,
            "horizons list is required in config",
        )],
        Field::Invalid(raw) => vec![ConfigIssue::error(
            HORIZONS,
            format!("horizons must be a list of integers (got {raw})"),
        )],
        Field::Valid(horizons) if horizons.is_empty() => vec![ConfigIssue::error(
            HORIZONS,
            "horizons list must not be empty",
        )],
        Field::Valid(_) => Vec::new(),
    }
}
