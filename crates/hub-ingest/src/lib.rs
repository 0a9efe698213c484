//! Forecast hub data ingestion.
//!
//! Reads target-data and model-output CSV files, maps user headers onto the
//! canonical column names, and loads location reference tables.

pub mod csv_table;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod mapper;
pub mod polars_utils;
pub mod reference;

pub use csv_table::{CsvTable, read_csv_table};
pub use discovery::{find_target_data_file, list_csv_files, list_model_output_files};
pub use error::{IngestError, Result};
pub use loader::{DEV_DATA_DIR, DataPaths, load_model_output, load_target_data};
pub use mapper::{
    ModelTable, SnapshotSelection, TargetData, derive_horizon, map_model_output_tables,
    map_target_table,
};
pub use reference::{default_location_reference, load_location_reference};
