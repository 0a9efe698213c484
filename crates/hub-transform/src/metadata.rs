//! Descriptive metadata bundle for the dashboard front end.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use hub_model::{DashboardConfig, ForecastPeriod, LocationEntry, format_iso_date};

use crate::period::{AnchorDates, resolve_period};

/// A static period as listed in the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonInfo {
    pub season_id: String,
    pub display_string: String,
    pub start_date: String,
    pub end_date: String,
}

/// A resolved dynamic period as listed in the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicPeriodInfo {
    pub label: String,
    pub display_string: String,
    pub is_dynamic: bool,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataBundle {
    pub locations: Vec<LocationEntry>,
    pub full_range_seasons: Vec<SeasonInfo>,
    pub dynamic_time_period: Vec<DynamicPeriodInfo>,
    pub model_names: Vec<String>,
    /// Latest model reference date.
    pub default_selected_date: Option<String>,
    /// The static period flagged as default-selected.
    pub default_season_id: Option<String>,
}

/// Build the metadata bundle. Dynamic periods that cannot be resolved are
/// left out.
pub fn summarize(config: &DashboardConfig, locations: Vec<LocationEntry>, anchors: &AnchorDates) -> MetadataBundle {
    let full_range_seasons = config
        .static_periods()
        .map(|period| SeasonInfo {
            season_id: period.period_id.clone(),
            display_string: period.display_string.clone(),
            start_date: format_iso_date(period.start_date),
            end_date: format_iso_date(period.end_date),
        })
        .collect();

    let dynamic_time_period = config
        .forecast_periods
        .iter()
        .filter_map(|period| {
            let ForecastPeriod::Dynamic(dynamic) = period else {
                return None;
            };
            match resolve_period(period, anchors, config.time_unit) {
                Ok(range) => Some(DynamicPeriodInfo {
                    label: dynamic.period_id.clone(),
                    display_string: dynamic.display_string.clone(),
                    is_dynamic: true,
                    start_date: format_iso_date(range.start),
                    end_date: format_iso_date(range.end),
                }),
                Err(err) => {
                    warn!(period_id = %dynamic.period_id, error = %err, "dynamic period omitted from metadata");
                    None
                }
            }
        })
        .collect();

    let bundle = MetadataBundle {
        locations,
        full_range_seasons,
        dynamic_time_period,
        model_names: config.model_names().into_iter().map(str::to_string).collect(),
        default_selected_date: anchors.latest_reference_date.map(format_iso_date),
        default_season_id: config
            .default_period()
            .map(|period| period.period_id.clone()),
    };
    info!(
        default_selected_date = ?bundle.default_selected_date,
        location_count = bundle.locations.len(),
        "metadata generated"
    );
    bundle
}
