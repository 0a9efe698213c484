//! Data file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| IngestError::DirectoryRead {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        let is_csv = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// The target-data file: the first CSV in `dir` by name.
pub fn find_target_data_file(dir: &Path) -> Result<PathBuf> {
    list_csv_files(dir)?
        .into_iter()
        .next()
        .ok_or_else(|| IngestError::NoDataFound {
            what: format!("no CSV file found in {}", dir.display()),
        })
}

/// CSV files for one model under `<model_output_dir>/<model_name>/`.
///
/// Returns `None`, with a warning, when the directory is missing or holds
/// no CSV files; the caller skips that model.
pub fn list_model_output_files(model_output_dir: &Path, model_name: &str) -> Result<Option<Vec<PathBuf>>> {
    let model_dir = model_output_dir.join(model_name);
    if !model_dir.is_dir() {
        tracing::warn!(
            model = %model_name,
            path = %model_dir.display(),
            "model output directory not found, skipping model"
        );
        return Ok(None);
    }
    let files = list_csv_files(&model_dir)?;
    if files.is_empty() {
        tracing::warn!(
            model = %model_name,
            path = %model_dir.display(),
            "no CSV files found for model, skipping model"
        );
        return Ok(None);
    }
    Ok(Some(files))
}
