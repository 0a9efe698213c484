use std::path::PathBuf;

use hub_ingest::SnapshotSelection;
use hub_model::{ConfigIssue, DateRange};
use hub_transform::MetadataBundle;

#[derive(Debug)]
pub struct CheckResult {
    pub config_path: PathBuf,
    pub issues: Vec<ConfigIssue>,
    pub has_errors: bool,
}

#[derive(Debug)]
pub struct BuildResult {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub target_rows: usize,
    /// Long-format model output rows before pivoting.
    pub model_rows: usize,
    /// Rows after the quantile pivot.
    pub wide_rows: usize,
    pub quantile_levels: Vec<String>,
    pub snapshot: Option<SnapshotSelection>,
    pub periods: Vec<PeriodSummary>,
    pub warnings: Vec<ConfigIssue>,
    pub metadata: MetadataBundle,
}

#[derive(Debug)]
pub struct PeriodSummary {
    pub period_id: String,
    pub range: DateRange,
    pub is_dynamic: bool,
    pub target_rows: usize,
    pub model_rows: usize,
    /// Row counts per model-output target key; empty in combined mode.
    pub targets: Vec<(String, usize)>,
}
