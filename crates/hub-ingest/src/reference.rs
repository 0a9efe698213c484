//! Location reference tables.

use std::path::Path;

use hub_model::LocationReference;

use crate::error::{IngestError, Result};

/// US state FIPS code to name mapping shipped with the crate.
const US_STATE_FIPS_MAPPING: &str = include_str!("../data/us_state_fips_mapping.json");

/// The bundled US state FIPS reference.
pub fn default_location_reference() -> Result<LocationReference> {
    LocationReference::from_json_str(US_STATE_FIPS_MAPPING).map_err(|err| IngestError::Reference {
        origin: "bundled us_state_fips_mapping.json".to_string(),
        message: err.to_string(),
    })
}

/// Load a `{"code": "name", ...}` JSON object from disk.
pub fn load_location_reference(path: &Path) -> Result<LocationReference> {
    let json = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let reference =
        LocationReference::from_json_str(&json).map_err(|err| IngestError::Reference {
            origin: path.display().to_string(),
            message: err.to_string(),
        })?;
    tracing::info!(
        path = %path.display(),
        location_count = reference.len(),
        "loaded location reference"
    );
    Ok(reference)
}
