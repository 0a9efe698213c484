//! Error types for forecast hub transformations.

use chrono::NaiveDate;
use hub_ingest::IngestError;
use hub_model::AnchorMode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A dynamic period's anchor date is not available in the data.
    #[error("cannot resolve period '{period_id}': no {anchor_mode} date available to anchor on")]
    UnresolvedAnchor {
        period_id: String,
        anchor_mode: AnchorMode,
    },

    /// The period's offset from its anchor leaves the representable date range.
    #[error(
        "period '{period_id}' is out of the supported date range: {offset_days} days from {anchor}"
    )]
    PeriodOutOfRange {
        period_id: String,
        anchor: NaiveDate,
        offset_days: i64,
    },

    /// A column the transformation needs is absent.
    #[error("column '{column}' not found in {frame}")]
    ColumnNotFound { column: String, frame: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// Reading a normalised frame failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
