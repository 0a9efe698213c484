use hub_model::ConfigIssue;

use crate::context::ValidationContext;
use crate::draft::{ConfigDraft, PREDICTION_INTERVALS};

pub fn check(draft: &ConfigDraft, _ctx: &ValidationContext) -> Vec<ConfigIssue> {
    if draft.prediction_intervals.is_empty() {
        return vec![ConfigIssue::error(
            PREDICTION_INTERVALS,
            "At least one prediction interval must be defined",
        )];
    }
    Vec::new()
}
