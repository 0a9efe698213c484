use hub_model::ConfigIssue;

use crate::context::ValidationContext;
use crate::draft::{ConfigDraft, SINGLE_LOCATION_MAPPING};

/// Single-location mode needs a mapped code; multi-location mode detects
/// locations from the data and needs nothing here.
pub fn check(draft: &ConfigDraft, ctx: &ValidationContext) -> Vec<ConfigIssue> {
    if !draft.is_single_location {
        return Vec::new();
    }
    match &draft.single_location {
        None => vec![ConfigIssue::error(
            SINGLE_LOCATION_MAPPING,
            "single_location_mapping is required when is_single_location_forecast is true. \
             Please specify a location code (e.g., '01' for Alabama)",
        )],
        Some(code) if !ctx.locations.contains(code) => vec![ConfigIssue::warning(
            SINGLE_LOCATION_MAPPING,
            format!(
                "Location code '{code}' is not in the location reference. \
                 Dashboard may not display the location name correctly"
            ),
        )],
        Some(_) => Vec::new(),
    }
}
