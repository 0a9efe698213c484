use hub_model::ConfigIssue;

use crate::context::ValidationContext;
use crate::draft::ConfigDraft;

/// Two canonical columns of one data family may not share a source header.
pub fn check(draft: &ConfigDraft, _ctx: &ValidationContext) -> Vec<ConfigIssue> {
    draft
        .column_mapping
        .conflicting_sources()
        .into_iter()
        .map(|(source, canonical)| {
            ConfigIssue::error(
                "column_mapping",
                format!(
                    "Column '{source}' is mapped to more than one canonical column: {}",
                    canonical.join(", ")
                ),
            )
        })
        .collect()
}
