use hub_model::{ConfigIssue, LocalDataDirs};

use crate::context::ValidationContext;
use crate::draft::ConfigDraft;

/// Online links and local data directories are mutually exclusive.
pub fn check(draft: &ConfigDraft, ctx: &ValidationContext) -> Vec<ConfigIssue> {
    if draft.links.is_online() && ctx.local_dirs.any() {
        return vec![ConfigIssue::error(
            "data_source",
            format!(
                "Both local and online data sources are configured. Please use either local \
                 directories ({}/, {}/) or online links, not both",
                LocalDataDirs::TARGET_DATA_DIR,
                LocalDataDirs::MODEL_OUTPUT_DIR
            ),
        )];
    }
    Vec::new()
}
