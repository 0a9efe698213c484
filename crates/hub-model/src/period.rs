//! Forecast periods: fixed date windows and windows anchored to fresh data.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which data family supplies the freshness date of a dynamic period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorMode {
    /// Latest `date` in the target data.
    #[serde(rename = "target-data")]
    TargetData,
    /// Latest `reference_date` in the model output.
    #[serde(rename = "model-output")]
    ModelOutput,
}

impl AnchorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorMode::TargetData => "target-data",
            AnchorMode::ModelOutput => "model-output",
        }
    }
}

impl fmt::Display for AnchorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "target-data" => Ok(AnchorMode::TargetData),
            "model-output" => Ok(AnchorMode::ModelOutput),
            _ => Err(format!(
                "Unknown anchor_mode '{s}'. Must be 'target-data' or 'model-output'"
            )),
        }
    }
}

/// How a dynamic period finds its bounds at processing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAnchor {
    pub anchor_mode: AnchorMode,
    /// Static period this window is classified against.
    pub anchor_on: String,
    /// Number of `time_unit` steps to look back from the anchor date (<= 0).
    pub range_calculation: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPeriod {
    pub period_id: String,
    pub display_string: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_default_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicPeriod {
    pub period_id: String,
    pub display_string: String,
    pub time_anchor: TimeAnchor,
}

/// A forecast period, either fixed or resolved lazily against loaded data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ForecastPeriod {
    Static(StaticPeriod),
    Dynamic(DynamicPeriod),
}

impl ForecastPeriod {
    pub fn period_id(&self) -> &str {
        match self {
            ForecastPeriod::Static(period) => &period.period_id,
            ForecastPeriod::Dynamic(period) => &period.period_id,
        }
    }

    pub fn display_string(&self) -> &str {
        match self {
            ForecastPeriod::Static(period) => &period.display_string,
            ForecastPeriod::Dynamic(period) => &period.display_string,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, ForecastPeriod::Dynamic(_))
    }

    pub fn as_static(&self) -> Option<&StaticPeriod> {
        match self {
            ForecastPeriod::Static(period) => Some(period),
            ForecastPeriod::Dynamic(_) => None,
        }
    }

    pub fn as_dynamic(&self) -> Option<&DynamicPeriod> {
        match self {
            ForecastPeriod::Static(_) => None,
            ForecastPeriod::Dynamic(period) => Some(period),
        }
    }
}

/// Concrete inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
