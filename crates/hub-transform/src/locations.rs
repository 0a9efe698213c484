//! Location list reconciliation across target data and model output.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::info;

use hub_ingest::polars_utils::{column_strings, has_column};
use hub_model::{LocationEntry, LocationReference, columns};

use crate::error::Result;

/// Unique locations sorted by code.
///
/// Names from target data win; codes seen only in model output are named
/// from the reference, or "Unknown". Target data contributes only when it
/// carries both `location` and `location_name`.
pub fn reconcile_locations(
    target_data: &DataFrame,
    model_output: &DataFrame,
    reference: &LocationReference,
) -> Result<Vec<LocationEntry>> {
    let mut names: BTreeMap<String, String> = BTreeMap::new();

    if has_column(target_data, columns::LOCATION) && has_column(target_data, columns::LOCATION_NAME) {
        let codes = column_strings(target_data, columns::LOCATION)?;
        let labels = column_strings(target_data, columns::LOCATION_NAME)?;
        for (code, label) in codes.into_iter().zip(labels) {
            if let (Some(code), Some(label)) = (code, label) {
                names.entry(code).or_insert(label);
            }
        }
    }
    let from_target = names.len();

    if has_column(model_output, columns::LOCATION) {
        for code in column_strings(model_output, columns::LOCATION)?.into_iter().flatten() {
            if !names.contains_key(&code) {
                let label = reference.name_or_unknown(&code).to_string();
                names.insert(code, label);
            }
        }
    }

    info!(
        location_count = names.len(),
        from_target_data = from_target,
        "reconciled locations"
    );
    Ok(names
        .into_iter()
        .map(|(code, name)| LocationEntry::new(code, name))
        .collect())
}
