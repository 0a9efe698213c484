//! Column mapping: user-labelled CSV tables into canonical Polars frames.
//!
//! Both data families go through the same steps. Source headers are
//! resolved through the [`ColumnMapping`], required columns are checked,
//! and cells are retyped. Dates are stored as ISO `YYYY-MM-DD` strings so
//! downstream comparisons are plain string comparisons; `as_of` keeps its
//! time of day when it has one. Blank cells and markers such as `NA` are
//! read as null in date and numeric columns.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::{debug, info, warn};

use hub_model::{
    ColumnMapping, ObservationFormat, columns, format_iso_date, format_iso_datetime, parse_iso_date,
    parse_iso_datetime,
};

use crate::csv_table::CsvTable;
use crate::error::{IngestError, Result};
use crate::polars_utils::{is_missing, parse_f64, parse_i64};

const TARGET_DATASET: &str = "target data";

/// Which `as_of` snapshot was kept from a vintaged target-data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSelection {
    pub latest_as_of: String,
    /// Distinct `as_of` values seen in the file.
    pub snapshot_count: usize,
    /// Rows dropped because they belong to an older snapshot.
    pub dropped_rows: usize,
}

/// Normalised target data.
#[derive(Debug, Clone)]
pub struct TargetData {
    pub frame: DataFrame,
    pub snapshot: Option<SnapshotSelection>,
}

/// One model's raw output table.
#[derive(Debug, Clone)]
pub struct ModelTable {
    pub model_name: String,
    pub table: CsvTable,
}

impl ModelTable {
    pub fn new(model_name: impl Into<String>, table: CsvTable) -> Self {
        Self {
            model_name: model_name.into(),
            table,
        }
    }
}

/// Canonical column resolved to its position in a source table.
struct ResolvedColumn {
    canonical: &'static str,
    index: usize,
}

/// Resolve every mapped source header present in `table`.
///
/// Required canonical columns that cannot be found raise
/// `RequiredColumnMissing`; optional ones are skipped.
fn resolve_columns(
    table: &CsvTable,
    renames: &[(&str, &'static str)],
    required: &[&'static str],
    dataset: &str,
) -> Result<Vec<ResolvedColumn>> {
    let mut resolved = Vec::new();
    for &(source, canonical) in renames {
        match table.column_index(source) {
            Some(index) => resolved.push(ResolvedColumn {
                canonical,
                index,
            }),
            None if required.contains(&canonical) => {
                return Err(IngestError::RequiredColumnMissing {
                    column: canonical.to_string(),
                    source_header: source.to_string(),
                    dataset: dataset.to_string(),
                });
            }
            None => debug!(
                column = %canonical,
                source_header = %source,
                dataset = %dataset,
                "mapped column not present, skipping"
            ),
        }
    }
    Ok(resolved)
}

fn find(resolved: &[ResolvedColumn], canonical: &str) -> Option<usize> {
    resolved
        .iter()
        .find(|column| column.canonical == canonical)
        .map(|column| column.index)
}

/// Parse a date cell; blank cells become `None`.
fn date_cell<T>(
    value: &str,
    parse: fn(&str) -> Option<T>,
    column: &str,
    row: usize,
    dataset: &str,
) -> Result<Option<T>> {
    if is_missing(value) {
        return Ok(None);
    }
    parse(value)
        .map(Some)
        .ok_or_else(|| IngestError::InvalidDate {
            column: column.to_string(),
            row: row + 1,
            value: value.to_string(),
            dataset: dataset.to_string(),
        })
}

fn date_column(
    table: &CsvTable,
    index: usize,
    column: &str,
    dataset: &str,
) -> Result<Vec<Option<NaiveDate>>> {
    (0..table.len())
        .map(|row| date_cell(table.cell(row, index), parse_iso_date, column, row, dataset))
        .collect()
}

fn datetime_column(
    table: &CsvTable,
    index: usize,
    column: &str,
    dataset: &str,
) -> Result<Vec<Option<NaiveDateTime>>> {
    (0..table.len())
        .map(|row| date_cell(table.cell(row, index), parse_iso_datetime, column, row, dataset))
        .collect()
}

fn invalid_number(value: &str, column: &str, row: usize, dataset: &str) -> IngestError {
    IngestError::InvalidNumber {
        column: column.to_string(),
        row: row + 1,
        value: value.to_string(),
        dataset: dataset.to_string(),
    }
}

fn f64_column(table: &CsvTable, index: usize, column: &str, dataset: &str) -> Result<Vec<Option<f64>>> {
    (0..table.len())
        .map(|row| {
            let value = table.cell(row, index);
            if is_missing(value) {
                return Ok(None);
            }
            parse_f64(value)
                .map(Some)
                .ok_or_else(|| invalid_number(value, column, row, dataset))
        })
        .collect()
}

fn i64_column(table: &CsvTable, index: usize, column: &str, dataset: &str) -> Result<Vec<Option<i64>>> {
    (0..table.len())
        .map(|row| {
            let value = table.cell(row, index);
            if is_missing(value) {
                return Ok(None);
            }
            parse_i64(value)
                .map(Some)
                .ok_or_else(|| invalid_number(value, column, row, dataset))
        })
        .collect()
}

fn string_column(table: &CsvTable, index: usize) -> Vec<Option<String>> {
    (0..table.len())
        .map(|row| {
            let value = table.cell(row, index);
            (!value.is_empty()).then(|| value.to_string())
        })
        .collect()
}

fn iso_strings(dates: &[Option<NaiveDate>]) -> Vec<Option<String>> {
    dates.iter().map(|date| date.map(format_iso_date)).collect()
}

/// Keep only rows selected by `keep`.
fn select_rows<T: Clone>(values: &[T], keep: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(keep)
        .filter(|(_, keep)| **keep)
        .map(|(value, _)| value.clone())
        .collect()
}

/// A typed column waiting to be turned into a Polars column.
enum ColumnValues {
    Text(Vec<Option<String>>),
    Float(Vec<Option<f64>>),
    Int(Vec<Option<i64>>),
}

impl ColumnValues {
    fn select(&self, keep: &[bool]) -> Self {
        match self {
            ColumnValues::Text(values) => ColumnValues::Text(select_rows(values, keep)),
            ColumnValues::Float(values) => ColumnValues::Float(select_rows(values, keep)),
            ColumnValues::Int(values) => ColumnValues::Int(select_rows(values, keep)),
        }
    }

    fn into_column(self, name: &str) -> Column {
        match self {
            ColumnValues::Text(values) => Series::new(name.into(), values).into(),
            ColumnValues::Float(values) => Series::new(name.into(), values).into(),
            ColumnValues::Int(values) => Series::new(name.into(), values).into(),
        }
    }
}

/// Assemble a frame with columns in `order`, skipping absent ones.
fn assemble_frame(mut columns: Vec<(&'static str, ColumnValues)>, order: &[&str]) -> Result<DataFrame> {
    columns.sort_by_key(|(name, _)| order.iter().position(|ordered| ordered == name));
    let columns: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| values.into_column(name))
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Map a raw target-data table onto canonical columns.
///
/// `date` and `observation` are required. Location, location name, target
/// and `as_of` are copied only when mapped and present. When an `as_of`
/// column exists only the latest snapshot is returned.
pub fn map_target_table(
    table: &CsvTable,
    mapping: &ColumnMapping,
    format: ObservationFormat,
) -> Result<TargetData> {
    let renames = mapping.target_data_renames();
    let resolved = resolve_columns(
        table,
        &renames,
        &[columns::DATE, columns::OBSERVATION],
        TARGET_DATASET,
    )?;

    let mut mapped: Vec<(&'static str, ColumnValues)> = Vec::new();
    let mut as_of: Option<Vec<Option<NaiveDateTime>>> = None;
    for column in &resolved {
        let values = match column.canonical {
            columns::DATE => ColumnValues::Text(iso_strings(&date_column(
                table,
                column.index,
                columns::DATE,
                TARGET_DATASET,
            )?)),
            columns::AS_OF => {
                let stamps = datetime_column(table, column.index, columns::AS_OF, TARGET_DATASET)?;
                let text = stamps
                    .iter()
                    .map(|stamp| stamp.map(format_iso_datetime))
                    .collect();
                as_of = Some(stamps);
                ColumnValues::Text(text)
            }
            columns::OBSERVATION => match format {
                ObservationFormat::Float => ColumnValues::Float(f64_column(
                    table,
                    column.index,
                    columns::OBSERVATION,
                    TARGET_DATASET,
                )?),
                ObservationFormat::Int => ColumnValues::Int(i64_column(
                    table,
                    column.index,
                    columns::OBSERVATION,
                    TARGET_DATASET,
                )?),
            },
            _ => ColumnValues::Text(string_column(table, column.index)),
        };
        mapped.push((column.canonical, values));
    }

    let snapshot = match as_of {
        Some(as_of) => {
            let (keep, selection) = latest_snapshot(&as_of);
            if let Some(selection) = &selection {
                mapped = mapped
                    .into_iter()
                    .map(|(name, values)| (name, values.select(&keep)))
                    .collect();
                if selection.snapshot_count > 1 || selection.dropped_rows > 0 {
                    warn!(
                        latest_as_of = %selection.latest_as_of,
                        snapshot_count = selection.snapshot_count,
                        dropped_rows = selection.dropped_rows,
                        "target data has multiple as_of snapshots; only the latest is used, \
                         historical snapshots are not supported yet"
                    );
                }
            }
            selection
        }
        None => None,
    };

    let frame = assemble_frame(mapped, &columns::TARGET_DATA_COLUMNS)?;
    info!(
        row_count = frame.height(),
        column_count = frame.width(),
        observation_format = %format,
        "mapped target data"
    );
    Ok(TargetData { frame, snapshot })
}

/// Rows belonging to the latest `as_of` snapshot.
///
/// Snapshots are compared by full timestamp, so two vintages published on
/// the same day stay distinct. Returns `None` for the selection when no row
/// carries an `as_of` value.
fn latest_snapshot(as_of: &[Option<NaiveDateTime>]) -> (Vec<bool>, Option<SnapshotSelection>) {
    let distinct: BTreeSet<NaiveDateTime> = as_of.iter().flatten().copied().collect();
    let Some(latest) = distinct.last().copied() else {
        return (vec![true; as_of.len()], None);
    };
    let keep: Vec<bool> = as_of.iter().map(|value| *value == Some(latest)).collect();
    let dropped_rows = keep.iter().filter(|keep| !**keep).count();
    let selection = SnapshotSelection {
        latest_as_of: format_iso_datetime(latest),
        snapshot_count: distinct.len(),
        dropped_rows,
    };
    (keep, Some(selection))
}

/// Horizon in time units between a reference date and a target end date,
/// truncated toward zero.
pub fn derive_horizon(reference_date: NaiveDate, target_end_date: NaiveDate, time_unit: i64) -> Result<i64> {
    if time_unit <= 0 {
        return Err(IngestError::InvalidTimeUnit { time_unit });
    }
    Ok((target_end_date - reference_date).num_days() / time_unit)
}

/// Accumulates model-output columns across tables.
#[derive(Default)]
struct ModelOutputColumns {
    reference_date: Vec<Option<String>>,
    target_end_date: Vec<Option<String>>,
    location: Vec<Option<String>>,
    target: Vec<Option<String>>,
    horizon: Vec<Option<i64>>,
    model: Vec<Option<String>>,
    output_type: Vec<Option<String>>,
    output_type_id: Vec<Option<String>>,
    value: Vec<Option<f64>>,
    present: BTreeSet<&'static str>,
}

impl ModelOutputColumns {
    fn push_table(&mut self, model: &ModelTable, mapping: &ColumnMapping, time_unit: i64) -> Result<()> {
        let dataset = format!("model output for {}", model.model_name);
        let table = &model.table;
        let renames = mapping.model_output_renames();
        let resolved = resolve_columns(
            table,
            &renames,
            &[columns::REFERENCE_DATE, columns::TARGET_END_DATE],
            &dataset,
        )?;

        let reference_index = find(&resolved, columns::REFERENCE_DATE).unwrap_or_default();
        let end_index = find(&resolved, columns::TARGET_END_DATE).unwrap_or_default();
        let reference = date_column(table, reference_index, columns::REFERENCE_DATE, &dataset)?;
        let target_end = date_column(table, end_index, columns::TARGET_END_DATE, &dataset)?;

        let horizon = match find(&resolved, columns::HORIZON) {
            Some(index) => i64_column(table, index, columns::HORIZON, &dataset)?,
            None => {
                debug!(model = %model.model_name, time_unit, "deriving horizon from dates");
                reference
                    .iter()
                    .zip(&target_end)
                    .map(|(reference, end)| match (reference, end) {
                        (Some(reference), Some(end)) => {
                            derive_horizon(*reference, *end, time_unit).map(Some)
                        }
                        _ if time_unit <= 0 => Err(IngestError::InvalidTimeUnit { time_unit }),
                        _ => Ok(None),
                    })
                    .collect::<Result<Vec<_>>>()?
            }
        };

        let rows = table.len();
        let text = |canonical: &str| -> Vec<Option<String>> {
            find(&resolved, canonical)
                .map(|index| string_column(table, index))
                .unwrap_or_else(|| vec![None; rows])
        };
        let value = match find(&resolved, columns::VALUE) {
            Some(index) => f64_column(table, index, columns::VALUE, &dataset)?,
            None => vec![None; rows],
        };

        self.reference_date.extend(iso_strings(&reference));
        self.target_end_date.extend(iso_strings(&target_end));
        self.location.extend(text(columns::LOCATION));
        self.target.extend(text(columns::TARGET));
        self.horizon.extend(horizon);
        self.model
            .extend(std::iter::repeat_n(Some(model.model_name.clone()), rows));
        self.output_type.extend(text(columns::OUTPUT_TYPE));
        self.output_type_id.extend(text(columns::OUTPUT_TYPE_ID));
        self.value.extend(value);

        self.present.extend([
            columns::REFERENCE_DATE,
            columns::TARGET_END_DATE,
            columns::HORIZON,
            columns::MODEL,
        ]);
        self.present.extend(resolved.iter().map(|column| column.canonical));

        debug!(model = %model.model_name, row_count = rows, "mapped model output table");
        Ok(())
    }

    fn into_frame(self) -> Result<DataFrame> {
        let present = self.present;
        let candidates = [
            (columns::REFERENCE_DATE, ColumnValues::Text(self.reference_date)),
            (columns::TARGET_END_DATE, ColumnValues::Text(self.target_end_date)),
            (columns::LOCATION, ColumnValues::Text(self.location)),
            (columns::TARGET, ColumnValues::Text(self.target)),
            (columns::HORIZON, ColumnValues::Int(self.horizon)),
            (columns::MODEL, ColumnValues::Text(self.model)),
            (columns::OUTPUT_TYPE, ColumnValues::Text(self.output_type)),
            (columns::OUTPUT_TYPE_ID, ColumnValues::Text(self.output_type_id)),
            (columns::VALUE, ColumnValues::Float(self.value)),
        ];
        let mapped = candidates
            .into_iter()
            .filter(|(name, _)| present.contains(name))
            .collect();
        assemble_frame(mapped, &columns::MODEL_OUTPUT_COLUMNS)
    }
}

/// Map and concatenate per-model output tables into one frame.
///
/// Adds a `model` column from each table's model name. When no horizon
/// column is mapped the horizon is derived from the two dates.
pub fn map_model_output_tables(
    tables: &[ModelTable],
    mapping: &ColumnMapping,
    time_unit: i64,
) -> Result<DataFrame> {
    let mut accumulated = ModelOutputColumns::default();
    for table in tables {
        accumulated.push_table(table, mapping, time_unit)?;
    }
    let frame = accumulated.into_frame()?;
    info!(
        model_count = tables.len(),
        row_count = frame.height(),
        "mapped model output"
    );
    Ok(frame)
}
