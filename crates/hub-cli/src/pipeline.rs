//! Dashboard build pipeline with explicit stages.
//!
//! 1. **Validate**: load and check the configuration
//! 2. **Ingest**: read and map target data and model output
//! 3. **Transform**: pivot quantiles, reconcile locations, partition by period
//! 4. **Summarize**: build the metadata bundle and the run summary
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use hub_ingest::{
    DataPaths, TargetData, default_location_reference, load_location_reference, load_model_output,
    load_target_data,
};
use hub_model::{DashboardConfig, LocalDataDirs, LocationEntry, LocationReference};
use hub_transform::{
    AnchorDates, ModelOutputSlice, PartitionedData, PivotOutcome, partition_by_period,
    pivot_quantiles, reconcile_locations, summarize,
};
use hub_validate::{ConfigError, ValidationContext, load_config};

use crate::types::{BuildResult, CheckResult, PeriodSummary};

/// Configuration file looked up under a project root.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Where a project's configuration and data live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub config: PathBuf,
    /// Directory holding `target-data/` and `model-output/`.
    pub data_root: PathBuf,
    pub data: DataPaths,
}

impl ProjectPaths {
    pub fn resolve(root: &Path, config: Option<&Path>, dev: bool) -> Self {
        let data = DataPaths::for_root(root, dev);
        let data_root = data
            .target_data
            .parent()
            .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
        Self {
            root: root.to_path_buf(),
            config: config.map_or_else(|| root.join(CONFIG_FILE_NAME), Path::to_path_buf),
            data_root,
            data,
        }
    }
}

/// The user's location reference, or the bundled FIPS table.
pub fn load_reference(path: Option<&Path>) -> Result<LocationReference> {
    match path {
        Some(path) => load_location_reference(path)
            .with_context(|| format!("load location reference {}", path.display())),
        None => default_location_reference().context("load bundled location reference"),
    }
}

// ============================================================================
// Stage 1: Validate
// ============================================================================

pub fn validation_context(
    today: NaiveDate,
    reference: &LocationReference,
    data_root: &Path,
) -> ValidationContext {
    ValidationContext::new(today)
        .with_locations(reference.clone())
        .with_local_dirs(LocalDataDirs::detect(data_root))
}

/// Validate a configuration file, turning findings into a [`CheckResult`].
///
/// Only I/O and malformed-document problems are returned as errors.
pub fn check(config_path: &Path, ctx: &ValidationContext) -> Result<CheckResult> {
    let span = info_span!("check", config = %config_path.display());
    let _guard = span.enter();

    match load_config(config_path, ctx) {
        Ok(config) => Ok(CheckResult {
            config_path: config_path.to_path_buf(),
            issues: config.validation_warnings,
            has_errors: false,
        }),
        Err(ConfigError::InvalidConfiguration { report }) => Ok(CheckResult {
            config_path: config_path.to_path_buf(),
            issues: report.issues,
            has_errors: true,
        }),
        Err(error) => {
            Err(error).with_context(|| format!("read configuration {}", config_path.display()))
        }
    }
}

// ============================================================================
// Stage 2: Ingest
// ============================================================================

#[derive(Debug)]
pub struct IngestResult {
    pub target: TargetData,
    pub model_output: DataFrame,
}

pub fn ingest(config: &DashboardConfig, data: &DataPaths) -> Result<IngestResult> {
    let target = load_target_data(config, &data.target_data).context("load target data")?;
    let model_output = load_model_output(config, &data.model_output).context("load model output")?;
    Ok(IngestResult {
        target,
        model_output,
    })
}

// ============================================================================
// Stage 3: Transform
// ============================================================================

#[derive(Debug)]
pub struct TransformResult {
    pub pivot: PivotOutcome,
    pub anchors: AnchorDates,
    pub locations: Vec<LocationEntry>,
    pub partitions: PartitionedData,
}

pub fn transform(
    config: &DashboardConfig,
    ingested: &IngestResult,
    reference: &LocationReference,
) -> Result<TransformResult> {
    let span = info_span!("transform");
    let _guard = span.enter();

    let pivot = pivot_quantiles(&ingested.model_output).context("pivot quantiles")?;
    let wide = pivot.frame();
    let target = &ingested.target.frame;

    let anchors = AnchorDates::from_frames(target, wide).context("compute anchor dates")?;
    let locations = reconcile_locations(target, wide, reference).context("reconcile locations")?;
    let partitions =
        partition_by_period(config, target, wide, &anchors).context("partition by period")?;

    Ok(TransformResult {
        pivot,
        anchors,
        locations,
        partitions,
    })
}

// ============================================================================
// Stage 4: Summarize
// ============================================================================

pub fn summarize_build(
    paths: &ProjectPaths,
    config: &DashboardConfig,
    ingested: &IngestResult,
    transformed: TransformResult,
) -> BuildResult {
    let periods = transformed
        .partitions
        .iter()
        .map(|partition| PeriodSummary {
            period_id: partition.period_id.clone(),
            range: partition.range,
            is_dynamic: partition.is_dynamic,
            target_rows: partition.target_data.height(),
            model_rows: partition.model_output.row_count(),
            targets: match &partition.model_output {
                ModelOutputSlice::Combined(_) => Vec::new(),
                ModelOutputSlice::ByTarget(groups) => groups
                    .iter()
                    .map(|(target, frame)| (target.clone(), frame.height()))
                    .collect(),
            },
        })
        .collect();

    let quantile_levels = match &transformed.pivot {
        PivotOutcome::Pivoted {
            quantile_levels, ..
        } => quantile_levels.clone(),
        PivotOutcome::Unpivoted(_) => Vec::new(),
    };
    let wide_rows = transformed.pivot.frame().height();
    let metadata = summarize(config, transformed.locations, &transformed.anchors);

    BuildResult {
        root: paths.root.clone(),
        config_path: paths.config.clone(),
        target_rows: ingested.target.frame.height(),
        model_rows: ingested.model_output.height(),
        wide_rows,
        quantile_levels,
        snapshot: ingested.target.snapshot.clone(),
        periods,
        warnings: config.validation_warnings.clone(),
        metadata,
    }
}

/// Run every stage for one project.
pub fn run_build(
    paths: &ProjectPaths,
    reference: &LocationReference,
    today: NaiveDate,
) -> Result<BuildResult> {
    let span = info_span!("build", root = %paths.root.display());
    let _guard = span.enter();

    let ctx = validation_context(today, reference, &paths.data_root);
    let config = load_config(&paths.config, &ctx)
        .with_context(|| format!("load configuration {}", paths.config.display()))?;
    let ingested = ingest(&config, &paths.data)?;
    let transformed = transform(&config, &ingested, reference)?;
    let result = summarize_build(paths, &config, &ingested, transformed);

    info!(
        period_count = result.periods.len(),
        target_rows = result.target_rows,
        model_rows = result.model_rows,
        "build complete"
    );
    Ok(result)
}
