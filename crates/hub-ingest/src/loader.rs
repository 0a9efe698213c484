//! Discovery plus mapping for a project's data directories.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use hub_model::{DashboardConfig, DataFileFormat, LocalDataDirs};

use crate::csv_table::read_csv_table;
use crate::discovery::{find_target_data_file, list_model_output_files};
use crate::error::{IngestError, Result};
use crate::mapper::{ModelTable, TargetData, map_model_output_tables, map_target_table};

/// Directory holding development fixtures under a project root.
pub const DEV_DATA_DIR: &str = "test-data-input";

/// Locations of the two data directories for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub target_data: PathBuf,
    pub model_output: PathBuf,
}

impl DataPaths {
    /// `<root>/target-data` and `<root>/model-output`, or the same pair
    /// under `<root>/test-data-input/` when `dev` is set.
    pub fn for_root(root: &Path, dev: bool) -> Self {
        let base = if dev {
            root.join(DEV_DATA_DIR)
        } else {
            root.to_path_buf()
        };
        Self {
            target_data: base.join(LocalDataDirs::TARGET_DATA_DIR),
            model_output: base.join(LocalDataDirs::MODEL_OUTPUT_DIR),
        }
    }
}

/// Read and map the project's target-data file.
pub fn load_target_data(config: &DashboardConfig, dir: &Path) -> Result<TargetData> {
    let span = info_span!("load_target_data", dir = %dir.display());
    let _enter = span.enter();

    if config.target_data_file_format != DataFileFormat::Csv {
        return Err(IngestError::UnsupportedFileFormat {
            format: config.target_data_file_format.to_string(),
        });
    }

    let path = find_target_data_file(dir)?;
    let table = read_csv_table(&path)?;
    let data = map_target_table(
        &table,
        &config.column_mapping,
        config.target_data_observation_format,
    )?;
    info!(
        path = %path.display(),
        row_count = data.frame.height(),
        "target data loaded"
    );
    Ok(data)
}

/// Read and map every configured model's output files.
///
/// Models without a directory or without files are skipped with a warning;
/// `NoDataFound` is returned when nothing at all could be loaded.
pub fn load_model_output(config: &DashboardConfig, dir: &Path) -> Result<DataFrame> {
    let span = info_span!("load_model_output", dir = %dir.display());
    let _enter = span.enter();

    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut tables = Vec::new();
    let mut skipped = Vec::new();
    for model_name in config.model_names() {
        let Some(files) = list_model_output_files(dir, model_name)? else {
            skipped.push(model_name);
            continue;
        };
        for file in files {
            let table = read_csv_table(&file)?;
            if table.is_empty() {
                warn!(model = %model_name, path = %file.display(), "model output file has no rows");
                continue;
            }
            tables.push(ModelTable::new(model_name, table));
        }
    }

    if tables.is_empty() {
        return Err(IngestError::NoDataFound {
            what: format!("no model output files found under {}", dir.display()),
        });
    }
    if !skipped.is_empty() {
        warn!(
            skipped = %skipped.join(", "),
            "some configured models have no output data"
        );
    }

    map_model_output_tables(&tables, &config.column_mapping, i64::from(config.time_unit))
}
