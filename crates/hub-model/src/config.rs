//! The validated dashboard configuration.

use serde::{Deserialize, Serialize};

use crate::enums::{DataFileFormat, ObservationFormat};
use crate::interval::{MEDIAN_QUANTILE, PredictionInterval, sort_quantiles};
use crate::issues::ConfigIssue;
use crate::mapping::ColumnMapping;
use crate::models::ModelConfig;
use crate::period::{DynamicPeriod, ForecastPeriod, StaticPeriod};
use crate::target::TargetConfig;

/// Default value of `model_output_data_file_naming_standard`.
pub const DEFAULT_NAMING_STANDARD: &str = "ISODate";

/// Remote hub locations; unset when data is read from local directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceLinks {
    pub target_data_link: Option<String>,
    pub model_output_link: Option<String>,
}

impl DataSourceLinks {
    pub fn is_online(&self) -> bool {
        self.target_data_link.is_some() || self.model_output_link.is_some()
    }
}

/// Root configuration aggregate.
///
/// Built once by the validator and treated as read-only afterwards. Static
/// and dynamic periods are kept in declaration order, statics first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub links: DataSourceLinks,
    pub forecast_periods: Vec<ForecastPeriod>,
    pub is_single_location: bool,
    pub single_location: Option<String>,
    pub is_single_target: bool,
    pub targets: Vec<TargetConfig>,
    /// Days per forecast step; always >= 1.
    pub time_unit: u32,
    pub horizons: Vec<i64>,
    pub column_mapping: ColumnMapping,
    pub target_data_observation_format: ObservationFormat,
    pub target_data_file_format: DataFileFormat,
    pub models: Vec<ModelConfig>,
    pub prediction_intervals: Vec<PredictionInterval>,
    pub evaluation_intervals: Vec<PredictionInterval>,
    pub model_output_naming_standard: String,
    pub baseline_model: String,
    /// Always empty on a constructed config; kept for symmetry with warnings.
    pub validation_errors: Vec<ConfigIssue>,
    pub validation_warnings: Vec<ConfigIssue>,
}

impl DashboardConfig {
    /// Every quantile level needed by display and evaluation intervals,
    /// plus the median, deduplicated and sorted numerically.
    pub fn all_quantiles(&self) -> Vec<String> {
        let mut quantiles: Vec<String> = self
            .prediction_intervals
            .iter()
            .chain(self.evaluation_intervals.iter())
            .flat_map(|interval| interval.output_type_ids.iter().cloned())
            .collect();
        quantiles.push(MEDIAN_QUANTILE.to_string());
        sort_quantiles(&mut quantiles);
        quantiles.dedup();
        quantiles
    }

    pub fn all_period_ids(&self) -> Vec<&str> {
        self.forecast_periods
            .iter()
            .map(ForecastPeriod::period_id)
            .collect()
    }

    pub fn period(&self, period_id: &str) -> Option<&ForecastPeriod> {
        self.forecast_periods
            .iter()
            .find(|period| period.period_id() == period_id)
    }

    pub fn static_periods(&self) -> impl Iterator<Item = &StaticPeriod> {
        self.forecast_periods
            .iter()
            .filter_map(ForecastPeriod::as_static)
    }

    pub fn dynamic_periods(&self) -> impl Iterator<Item = &DynamicPeriod> {
        self.forecast_periods
            .iter()
            .filter_map(ForecastPeriod::as_dynamic)
    }

    /// The static period flagged `is_default_selected`, if any.
    pub fn default_period(&self) -> Option<&StaticPeriod> {
        self.static_periods()
            .find(|period| period.is_default_selected)
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.models
            .iter()
            .map(|model| model.model_name.as_str())
            .collect()
    }

    pub fn model(&self, model_name: &str) -> Option<&ModelConfig> {
        self.models
            .iter()
            .find(|model| model.model_name == model_name)
    }

    /// Model-output target keys declared for a period.
    pub fn valid_model_targets(&self, period_id: &str) -> Vec<&str> {
        self.targets
            .iter()
            .filter(|target| target.applies_to(period_id))
            .map(|target| target.corresponding_key_in_model_output.as_str())
            .collect()
    }
}
