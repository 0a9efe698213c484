//! Error types for forecast hub data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading and normalising input data.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No usable data file was found.
    #[error("no data found: {what}")]
    NoDataFound { what: String },

    /// The configured file format cannot be read yet.
    #[error("unsupported target data file format: {format}")]
    UnsupportedFileFormat { format: String },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    // === Mapping Errors ===
    /// A required canonical column has no source column.
    #[error("required column '{column}' (source header '{source_header}') not found in {dataset}")]
    RequiredColumnMissing {
        column: String,
        source_header: String,
        dataset: String,
    },

    /// A date cell could not be parsed.
    #[error("invalid date '{value}' in column '{column}' at row {row} of {dataset}")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
        dataset: String,
    },

    /// A numeric cell could not be parsed.
    #[error("invalid number '{value}' in column '{column}' at row {row} of {dataset}")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
        dataset: String,
    },

    /// Horizon derivation needs a positive time unit.
    #[error("time_unit must be greater than 0 to derive horizons (got {time_unit})")]
    InvalidTimeUnit { time_unit: i64 },

    // === Reference Errors ===
    /// Location reference table could not be loaded.
    #[error("invalid location reference {origin}: {message}")]
    Reference { origin: String, message: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
