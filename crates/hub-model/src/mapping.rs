//! User header names for the two input data families.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::columns;

/// User-chosen header name for each canonical column.
///
/// `None` means the dataset does not carry that dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    // Target data
    pub date_col: String,
    pub observation_col: String,
    pub location_col: Option<String>,
    pub location_name_col: Option<String>,
    pub target_col: Option<String>,
    pub as_of_col: Option<String>,

    // Model output
    pub reference_date_col: String,
    pub target_end_date_col: String,
    pub model_target_col: Option<String>,
    pub horizon_col: Option<String>,
    pub model_location_col: Option<String>,
    pub output_type_col: String,
    pub output_type_id_col: String,
    pub value_col: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_col: columns::DATE.to_string(),
            observation_col: "value".to_string(),
            location_col: None,
            location_name_col: None,
            target_col: None,
            as_of_col: None,
            reference_date_col: columns::REFERENCE_DATE.to_string(),
            target_end_date_col: columns::TARGET_END_DATE.to_string(),
            model_target_col: Some(columns::TARGET.to_string()),
            horizon_col: Some(columns::HORIZON.to_string()),
            model_location_col: Some(columns::LOCATION.to_string()),
            output_type_col: columns::OUTPUT_TYPE.to_string(),
            output_type_id_col: columns::OUTPUT_TYPE_ID.to_string(),
            value_col: columns::VALUE.to_string(),
        }
    }
}

impl ColumnMapping {
    /// Source header -> canonical column for target data.
    pub fn target_data_renames(&self) -> Vec<(&str, &'static str)> {
        let mut renames = vec![
            (self.date_col.as_str(), columns::DATE),
            (self.observation_col.as_str(), columns::OBSERVATION),
        ];
        let optional = [
            (&self.location_col, columns::LOCATION),
            (&self.location_name_col, columns::LOCATION_NAME),
            (&self.target_col, columns::TARGET),
            (&self.as_of_col, columns::AS_OF),
        ];
        for (source, canonical) in optional {
            if let Some(source) = source {
                renames.push((source.as_str(), canonical));
            }
        }
        renames
    }

    /// Source header -> canonical column for model output.
    pub fn model_output_renames(&self) -> Vec<(&str, &'static str)> {
        let mut renames = vec![
            (self.reference_date_col.as_str(), columns::REFERENCE_DATE),
            (self.target_end_date_col.as_str(), columns::TARGET_END_DATE),
        ];
        let optional = [
            (&self.model_target_col, columns::TARGET),
            (&self.horizon_col, columns::HORIZON),
            (&self.model_location_col, columns::LOCATION),
        ];
        for (source, canonical) in optional {
            if let Some(source) = source {
                renames.push((source.as_str(), canonical));
            }
        }
        renames.push((self.output_type_col.as_str(), columns::OUTPUT_TYPE));
        renames.push((self.output_type_id_col.as_str(), columns::OUTPUT_TYPE_ID));
        renames.push((self.value_col.as_str(), columns::VALUE));
        renames
    }

    /// Source headers claimed by more than one canonical column, per family.
    pub fn conflicting_sources(&self) -> Vec<(String, Vec<&'static str>)> {
        let mut conflicts = Vec::new();
        for renames in [self.target_data_renames(), self.model_output_renames()] {
            let mut by_source: BTreeMap<&str, Vec<&'static str>> = BTreeMap::new();
            for (source, canonical) in renames {
                by_source.entry(source).or_default().push(canonical);
            }
            for (source, canonical) in by_source {
                if canonical.len() > 1 {
                    conflicts.push((source.to_string(), canonical));
                }
            }
        }
        conflicts
    }
}

/// Which local data directories exist next to the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalDataDirs {
    pub target_data: bool,
    pub model_output: bool,
}

impl LocalDataDirs {
    pub const TARGET_DATA_DIR: &'static str = "target-data";
    pub const MODEL_OUTPUT_DIR: &'static str = "model-output";

    pub fn detect(root: &Path) -> Self {
        Self {
            target_data: root.join(Self::TARGET_DATA_DIR).is_dir(),
            model_output: root.join(Self::MODEL_OUTPUT_DIR).is_dir(),
        }
    }

    pub fn any(&self) -> bool {
        self.target_data || self.model_output
    }
}
