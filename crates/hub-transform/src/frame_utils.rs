//! DataFrame helpers shared by the transformations.

use chrono::NaiveDate;
use polars::prelude::*;

use hub_ingest::polars_utils::{column_strings, has_column};
use hub_model::parse_iso_date;

use crate::error::{Result, TransformError};

/// Fail with `ColumnNotFound` unless `df` has `column`.
pub fn require_column(df: &DataFrame, column: &str, frame: &str) -> Result<()> {
    if has_column(df, column) {
        Ok(())
    } else {
        Err(TransformError::ColumnNotFound {
            column: column.to_string(),
            frame: frame.to_string(),
        })
    }
}

/// Cells of an ISO-date string column parsed as dates.
pub fn date_cells(df: &DataFrame, column: &str, frame: &str) -> Result<Vec<Option<NaiveDate>>> {
    require_column(df, column, frame)?;
    Ok(column_strings(df, column)?
        .iter()
        .map(|cell| cell.as_deref().and_then(parse_iso_date))
        .collect())
}

/// Latest date in a column; `None` when absent or entirely null.
pub fn max_date(df: &DataFrame, column: &str) -> Result<Option<NaiveDate>> {
    if !has_column(df, column) {
        return Ok(None);
    }
    Ok(date_cells(df, column, column)?.into_iter().flatten().max())
}

/// Rows of `df` where `keep` is true.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

/// Rows of `df` at `indices`, in that order; indices may repeat.
pub fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let indices: Vec<IdxSize> = indices.iter().map(|idx| *idx as IdxSize).collect();
    let indices = IdxCa::from_vec("idx".into(), indices);
    Ok(df.take(&indices)?)
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}
