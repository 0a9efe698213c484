//! Canonical column names used after header mapping.

pub const DATE: &str = "date";
pub const OBSERVATION: &str = "observation";
pub const LOCATION: &str = "location";
pub const LOCATION_NAME: &str = "location_name";
pub const TARGET: &str = "target";
pub const AS_OF: &str = "as_of";

pub const REFERENCE_DATE: &str = "reference_date";
pub const TARGET_END_DATE: &str = "target_end_date";
pub const HORIZON: &str = "horizon";
pub const OUTPUT_TYPE: &str = "output_type";
pub const OUTPUT_TYPE_ID: &str = "output_type_id";
pub const VALUE: &str = "value";
/// Added by the ingestor; holds the model directory name.
pub const MODEL: &str = "model";

/// `output_type` value of rows that take part in the quantile pivot.
pub const QUANTILE_OUTPUT_TYPE: &str = "quantile";

/// Canonical target-data columns in output order.
pub const TARGET_DATA_COLUMNS: [&str; 6] =
    [DATE, OBSERVATION, LOCATION, LOCATION_NAME, TARGET, AS_OF];

/// Canonical model-output columns in output order.
pub const MODEL_OUTPUT_COLUMNS: [&str; 9] = [
    REFERENCE_DATE,
    TARGET_END_DATE,
    LOCATION,
    TARGET,
    HORIZON,
    MODEL,
    OUTPUT_TYPE,
    OUTPUT_TYPE_ID,
    VALUE,
];

/// Columns excluded from the pivot identity key.
pub const PIVOT_VALUE_COLUMNS: [&str; 3] = [OUTPUT_TYPE, OUTPUT_TYPE_ID, VALUE];
