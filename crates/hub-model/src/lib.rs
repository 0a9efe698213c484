//! Configuration model for the forecast hub dashboard builder.
//!
//! Every type here is produced by `hub-validate` from a checked configuration
//! document and consumed read-only by the ingest and transform crates.

pub mod columns;
pub mod config;
pub mod dates;
pub mod enums;
pub mod interval;
pub mod issues;
pub mod location;
pub mod mapping;
pub mod models;
pub mod period;
pub mod target;

pub use config::{DEFAULT_NAMING_STANDARD, DashboardConfig, DataSourceLinks};
pub use dates::{format_iso_date, format_iso_datetime, parse_iso_date, parse_iso_datetime};
pub use enums::{DataFileFormat, ObservationFormat};
pub use interval::{
    MEDIAN_QUANTILE, PredictionInterval, canonical_quantile, quantile_column_name,
    quantile_from_column_name, sort_quantiles,
};
pub use issues::{ConfigIssue, IssueSeverity, ValidationReport};
pub use location::{LocationEntry, LocationReference, UNKNOWN_LOCATION_NAME};
pub use mapping::{ColumnMapping, LocalDataDirs};
pub use models::{ColorPalette, DEFAULT_COLOR_PALETTE, ModelConfig};
pub use period::{AnchorMode, DateRange, DynamicPeriod, ForecastPeriod, StaticPeriod, TimeAnchor};
pub use target::TargetConfig;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_report_counts() {
        let mut report = ValidationReport::default();
        report.push(ConfigIssue::error("time_unit", "time_unit is required"));
        report.push(ConfigIssue::warning("targets", "defaulting to all periods"));
        report.push(ConfigIssue::warning("forecast_periods", "duplicate display"));
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 2);
        assert!(report.has_errors());
    }

    #[test]
    fn issue_serializes_lowercase_severity() {
        let issue = ConfigIssue::warning("time_unit", "unusually large");
        let json = serde_json::to_string(&issue).expect("serialize issue");
        assert!(json.contains("\"severity\":\"warning\""));
    }
}
