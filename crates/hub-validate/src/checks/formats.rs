use hub_model::{ConfigIssue, ObservationFormat};

use crate::context::ValidationContext;
use crate::draft::{ConfigDraft, FILE_FORMAT, Field, OBSERVATION_FORMAT};

pub fn check(draft: &ConfigDraft, _ctx: &ValidationContext) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    match &draft.observation_format {
        Field::Missing => issues.push(ConfigIssue::warning(
            OBSERVATION_FORMAT,
            format!(
                "target_data_observation_format missing, defaulting to '{}'",
                ObservationFormat::default()
            ),
        )),
        Field::Invalid(raw) => issues.push(ConfigIssue::error(
            OBSERVATION_FORMAT,
            format!("Unknown target_data_observation_format '{raw}'. Must be 'float' or 'int'"),
        )),
        Field::Valid(_) => {}
    }
    if let Field::Invalid(raw) = &draft.file_format {
        issues.push(ConfigIssue::error(
            FILE_FORMAT,
            format!("Unsupported target_data_file_format '{raw}'. Must be 'csv' or 'parquet'"),
        ));
    }
    issues
}
