//! Long-to-wide reshaping of quantile forecasts, and its inverse.
//!
//! The pivot identity is every column except `output_type`,
//! `output_type_id` and `value`. Each identity becomes one wide row with a
//! Float64 column per quantile level (`q0_5` for level `0.5`). Rows with any
//! other output type keep their long shape and are appended after the
//! pivoted rows, with the quantile columns null.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;
use tracing::{debug, info, warn};

use hub_ingest::polars_utils::{any_to_string, column_f64s, column_strings};
use hub_model::{canonical_quantile, columns, quantile_column_name, quantile_from_column_name, sort_quantiles};

use crate::error::Result;
use crate::frame_utils::{column_names, take_rows};

/// Result of [`pivot_quantiles`].
#[derive(Debug, Clone)]
pub enum PivotOutcome {
    /// Quantile rows were reshaped; `quantile_levels` lists the levels in
    /// column order.
    Pivoted {
        frame: DataFrame,
        quantile_levels: Vec<String>,
    },
    /// Nothing to pivot; the input frame is returned as-is.
    Unpivoted(DataFrame),
}

impl PivotOutcome {
    pub fn frame(&self) -> &DataFrame {
        match self {
            PivotOutcome::Pivoted { frame, .. } | PivotOutcome::Unpivoted(frame) => frame,
        }
    }

    pub fn into_frame(self) -> DataFrame {
        match self {
            PivotOutcome::Pivoted { frame, .. } | PivotOutcome::Unpivoted(frame) => frame,
        }
    }

    pub fn is_pivoted(&self) -> bool {
        matches!(self, PivotOutcome::Pivoted { .. })
    }
}

/// Orderable form of one identity cell.
#[derive(Debug, Clone, PartialEq)]
enum KeyCell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl KeyCell {
    fn from_any(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => KeyCell::Null,
            AnyValue::Int8(v) => KeyCell::Int(i64::from(v)),
            AnyValue::Int16(v) => KeyCell::Int(i64::from(v)),
            AnyValue::Int32(v) => KeyCell::Int(i64::from(v)),
            AnyValue::Int64(v) => KeyCell::Int(v),
            AnyValue::UInt8(v) => KeyCell::Int(i64::from(v)),
            AnyValue::UInt16(v) => KeyCell::Int(i64::from(v)),
            AnyValue::UInt32(v) => KeyCell::Int(i64::from(v)),
            AnyValue::Float32(v) => KeyCell::Float(f64::from(v)),
            AnyValue::Float64(v) => KeyCell::Float(v),
            other => any_to_string(other).map_or(KeyCell::Null, KeyCell::Text),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            KeyCell::Null => 0,
            KeyCell::Int(_) => 1,
            KeyCell::Float(_) => 2,
            KeyCell::Text(_) => 3,
        }
    }
}

impl Eq for KeyCell {}

impl Ord for KeyCell {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyCell::Int(a), KeyCell::Int(b)) => a.cmp(b),
            (KeyCell::Float(a), KeyCell::Float(b)) => a.total_cmp(b),
            (KeyCell::Text(a), KeyCell::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for KeyCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Accumulated values of one identity.
struct IdentityGroup {
    first_row: usize,
    /// level -> (sum, count)
    levels: BTreeMap<String, (f64, usize)>,
}

fn identity_columns(df: &DataFrame) -> Vec<String> {
    column_names(df)
        .into_iter()
        .filter(|name| !columns::PIVOT_VALUE_COLUMNS.contains(&name.as_str()))
        .collect()
}

fn identity_key(df: &DataFrame, identity: &[String], row: usize) -> Result<Vec<KeyCell>> {
    identity
        .iter()
        .map(|name| {
            let cell = df.column(name)?.get(row)?;
            Ok(KeyCell::from_any(cell))
        })
        .collect()
}

fn null_strings(name: &str, len: usize) -> Column {
    Series::new(name.into(), vec![None::<String>; len]).into()
}

fn null_floats(name: &str, len: usize) -> Column {
    Series::new(name.into(), vec![None::<f64>; len]).into()
}

/// Reshape long quantile rows into one wide row per identity.
///
/// Wide rows are sorted by identity and quantile columns numerically by
/// level. Repeated `(identity, level)` values are averaged. A frame without
/// an `output_type` column or without quantile rows is passed through.
pub fn pivot_quantiles(frame: &DataFrame) -> Result<PivotOutcome> {
    let names = column_names(frame);
    let has = |column: &str| names.iter().any(|name| name == column);
    if !has(columns::OUTPUT_TYPE) {
        warn!("no output_type column in model output, skipping quantile pivot");
        return Ok(PivotOutcome::Unpivoted(frame.clone()));
    }

    let output_types = column_strings(frame, columns::OUTPUT_TYPE)?;
    let levels = if has(columns::OUTPUT_TYPE_ID) {
        column_strings(frame, columns::OUTPUT_TYPE_ID)?
    } else {
        vec![None; frame.height()]
    };
    let values = if has(columns::VALUE) {
        column_f64s(frame, columns::VALUE)?
    } else {
        vec![None; frame.height()]
    };

    let identity = identity_columns(frame);
    let mut groups: BTreeMap<Vec<KeyCell>, IdentityGroup> = BTreeMap::new();
    let mut other_rows = Vec::new();
    let mut all_levels = BTreeSet::new();

    for row in 0..frame.height() {
        let is_quantile = output_types[row].as_deref() == Some(columns::QUANTILE_OUTPUT_TYPE);
        let level = levels[row].as_deref().and_then(canonical_quantile);
        let Some(level) = level.filter(|_| is_quantile) else {
            if is_quantile {
                debug!(row, "quantile row without a numeric output_type_id kept in long form");
            }
            other_rows.push(row);
            continue;
        };

        let key = identity_key(frame, &identity, row)?;
        let group = groups.entry(key).or_insert_with(|| IdentityGroup {
            first_row: row,
            levels: BTreeMap::new(),
        });
        let slot = group.levels.entry(level.clone()).or_insert((0.0, 0));
        if let Some(value) = values[row] {
            slot.0 += value;
            slot.1 += 1;
        }
        all_levels.insert(level);
    }

    if groups.is_empty() {
        warn!("no 'quantile' output_type found, skipping quantile pivot");
        return Ok(PivotOutcome::Unpivoted(frame.clone()));
    }

    let mut quantile_levels: Vec<String> = all_levels.into_iter().collect();
    sort_quantiles(&mut quantile_levels);

    let identity_refs: Vec<&str> = identity.iter().map(String::as_str).collect();
    let identity_frame = frame.select(identity_refs.iter().copied())?;

    let representatives: Vec<usize> = groups.values().map(|group| group.first_row).collect();
    let mut pivoted = take_rows(&identity_frame, &representatives)?;
    for level in &quantile_levels {
        let cells: Vec<Option<f64>> = groups
            .values()
            .map(|group| {
                group
                    .levels
                    .get(level)
                    .filter(|(_, count)| *count > 0)
                    .map(|(sum, count)| sum / *count as f64)
            })
            .collect();
        pivoted.with_column(Series::new(quantile_column_name(level).into(), cells))?;
    }

    if !other_rows.is_empty() {
        let pivoted_len = pivoted.height();
        pivoted.with_column(Series::new(
            columns::OUTPUT_TYPE.into(),
            vec![Some(columns::QUANTILE_OUTPUT_TYPE); pivoted_len],
        ))?;
        pivoted.with_column(null_strings(columns::OUTPUT_TYPE_ID, pivoted_len))?;
        pivoted.with_column(null_floats(columns::VALUE, pivoted_len))?;

        let mut others = take_rows(&identity_frame, &other_rows)?;
        for level in &quantile_levels {
            others.with_column(null_floats(&quantile_column_name(level), other_rows.len()))?;
        }
        let pick = |cells: &[Option<String>]| -> Vec<Option<String>> {
            other_rows.iter().map(|row| cells[*row].clone()).collect()
        };
        others.with_column(Series::new(columns::OUTPUT_TYPE.into(), pick(&output_types)))?;
        others.with_column(Series::new(columns::OUTPUT_TYPE_ID.into(), pick(&levels)))?;
        let other_values: Vec<Option<f64>> = other_rows.iter().map(|row| values[*row]).collect();
        others.with_column(Series::new(columns::VALUE.into(), other_values))?;

        pivoted.vstack_mut(&others)?;
    }

    info!(
        wide_rows = groups.len(),
        long_rows = other_rows.len(),
        quantile_count = quantile_levels.len(),
        "pivoted quantile forecasts"
    );
    Ok(PivotOutcome::Pivoted {
        frame: pivoted,
        quantile_levels,
    })
}

/// Reverse [`pivot_quantiles`]: one long `quantile` row per non-null
/// quantile cell, plus the rows that were never pivoted.
///
/// Wide rows keep their order; within a row, levels ascend.
pub fn melt_quantiles(wide: &DataFrame) -> Result<DataFrame> {
    let names = column_names(wide);
    let mut quantile_columns: Vec<(String, String)> = names
        .iter()
        .filter_map(|name| quantile_from_column_name(name).map(|level| (name.clone(), level)))
        .collect();
    quantile_columns.sort_by(|a, b| {
        let a: f64 = a.1.parse().unwrap_or(f64::INFINITY);
        let b: f64 = b.1.parse().unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });

    let identity: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| {
            !columns::PIVOT_VALUE_COLUMNS.contains(name)
                && quantile_columns.iter().all(|(column, _)| column.as_str() != *name)
        })
        .collect();

    let long_cells = |column: &str| -> Result<Vec<Option<String>>> {
        if names.iter().any(|name| name == column) {
            Ok(column_strings(wide, column)?)
        } else {
            Ok(vec![None; wide.height()])
        }
    };
    let output_types = long_cells(columns::OUTPUT_TYPE)?;
    let output_type_ids = long_cells(columns::OUTPUT_TYPE_ID)?;
    let values: Vec<Option<f64>> = if names.iter().any(|name| name == columns::VALUE) {
        column_f64s(wide, columns::VALUE)?
    } else {
        vec![None; wide.height()]
    };
    let quantile_cells: Vec<Vec<Option<f64>>> = quantile_columns
        .iter()
        .map(|(column, _)| column_f64s(wide, column))
        .collect::<std::result::Result<_, _>>()?;

    let mut source_rows = Vec::new();
    let mut long_type = Vec::new();
    let mut long_id = Vec::new();
    let mut long_value = Vec::new();
    for row in 0..wide.height() {
        let is_long_row = output_types[row]
            .as_deref()
            .is_some_and(|kind| kind != columns::QUANTILE_OUTPUT_TYPE);
        if is_long_row {
            source_rows.push(row);
            long_type.push(output_types[row].clone());
            long_id.push(output_type_ids[row].clone());
            long_value.push(values[row]);
            continue;
        }
        for ((_, level), cells) in quantile_columns.iter().zip(&quantile_cells) {
            if let Some(value) = cells[row] {
                source_rows.push(row);
                long_type.push(Some(columns::QUANTILE_OUTPUT_TYPE.to_string()));
                long_id.push(Some(level.clone()));
                long_value.push(Some(value));
            }
        }
    }

    let mut long = take_rows(&wide.select(identity.iter().copied())?, &source_rows)?;
    long.with_column(Series::new(columns::OUTPUT_TYPE.into(), long_type))?;
    long.with_column(Series::new(columns::OUTPUT_TYPE_ID.into(), long_id))?;
    long.with_column(Series::new(columns::VALUE.into(), long_value))?;
    debug!(row_count = long.height(), "melted quantile forecasts");
    Ok(long)
}
