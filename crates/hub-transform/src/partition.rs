//! Slicing normalised data by forecast period.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use hub_ingest::polars_utils::{column_strings, has_column};
use hub_model::{DashboardConfig, DateRange, ForecastPeriod, columns};

use crate::error::Result;
use crate::frame_utils::{date_cells, filter_rows};
use crate::period::{AnchorDates, resolve_period};

/// Model output rows of one period.
#[derive(Debug, Clone)]
pub enum ModelOutputSlice {
    /// All rows together.
    Combined(DataFrame),
    /// Rows grouped by model-output target key, sorted by key. Only keys
    /// declared for the period are kept.
    ByTarget(Vec<(String, DataFrame)>),
}

impl ModelOutputSlice {
    pub fn row_count(&self) -> usize {
        match self {
            ModelOutputSlice::Combined(frame) => frame.height(),
            ModelOutputSlice::ByTarget(groups) => groups.iter().map(|(_, frame)| frame.height()).sum(),
        }
    }

    pub fn target(&self, key: &str) -> Option<&DataFrame> {
        match self {
            ModelOutputSlice::Combined(_) => None,
            ModelOutputSlice::ByTarget(groups) => groups
                .iter()
                .find(|(target, _)| target == key)
                .map(|(_, frame)| frame),
        }
    }
}

/// Data falling inside one period's date range.
#[derive(Debug, Clone)]
pub struct PeriodPartition {
    pub period_id: String,
    pub range: DateRange,
    pub is_dynamic: bool,
    pub target_data: DataFrame,
    pub model_output: ModelOutputSlice,
}

/// Partitions in configured period order.
#[derive(Debug, Clone, Default)]
pub struct PartitionedData {
    partitions: Vec<PeriodPartition>,
}

impl PartitionedData {
    pub fn get(&self, period_id: &str) -> Option<&PeriodPartition> {
        self.partitions
            .iter()
            .find(|partition| partition.period_id == period_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeriodPartition> {
        self.partitions.iter()
    }

    pub fn period_ids(&self) -> Vec<&str> {
        self.partitions
            .iter()
            .map(|partition| partition.period_id.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

fn rows_in_range(df: &DataFrame, column: &str, frame: &str, range: &DateRange) -> Result<DataFrame> {
    let keep: Vec<bool> = date_cells(df, column, frame)?
        .into_iter()
        .map(|date| date.is_some_and(|date| range.contains(date)))
        .collect();
    filter_rows(df, &keep)
}

fn group_by_target(model_output: &DataFrame, valid_targets: &[&str]) -> Result<Vec<(String, DataFrame)>> {
    let targets = column_strings(model_output, columns::TARGET)?;
    let mut rows_by_target: BTreeMap<&str, Vec<bool>> = BTreeMap::new();
    for (row, target) in targets.iter().enumerate() {
        let Some(target) = target.as_deref() else {
            continue;
        };
        if !valid_targets.contains(&target) {
            continue;
        }
        rows_by_target
            .entry(target)
            .or_insert_with(|| vec![false; targets.len()])[row] = true;
    }
    rows_by_target
        .into_iter()
        .map(|(target, keep)| Ok((target.to_string(), filter_rows(model_output, &keep)?)))
        .collect()
}

/// Split both frames by every configured period.
///
/// Target rows are kept when `date` lies in the period and model rows when
/// `reference_date` does; both bounds are inclusive. Dynamic periods whose
/// anchor cannot be resolved are skipped with a warning.
pub fn partition_by_period(
    config: &DashboardConfig,
    target_data: &DataFrame,
    model_output: &DataFrame,
    anchors: &AnchorDates,
) -> Result<PartitionedData> {
    let span = info_span!("partition_by_period", period_count = config.forecast_periods.len());
    let _enter = span.enter();

    let split_by_target = !config.is_single_target && has_column(model_output, columns::TARGET);
    let mut partitions = Vec::with_capacity(config.forecast_periods.len());

    for period in &config.forecast_periods {
        let range = match resolve_period(period, anchors, config.time_unit) {
            Ok(range) => range,
            Err(err) => {
                warn!(period_id = %period.period_id(), error = %err, "skipping period");
                continue;
            }
        };

        let period_target = rows_in_range(target_data, columns::DATE, "target data", &range)?;
        let period_model = rows_in_range(
            model_output,
            columns::REFERENCE_DATE,
            "model output",
            &range,
        )?;
        let model_slice = if split_by_target {
            let valid = config.valid_model_targets(period.period_id());
            ModelOutputSlice::ByTarget(group_by_target(&period_model, &valid)?)
        } else {
            ModelOutputSlice::Combined(period_model)
        };

        info!(
            period_id = %period.period_id(),
            range = %range,
            target_rows = period_target.height(),
            model_rows = model_slice.row_count(),
            "partitioned period"
        );
        partitions.push(PeriodPartition {
            period_id: period.period_id().to_string(),
            range,
            is_dynamic: matches!(period, ForecastPeriod::Dynamic(_)),
            target_data: period_target,
            model_output: model_slice,
        });
    }

    Ok(PartitionedData { partitions })
}
