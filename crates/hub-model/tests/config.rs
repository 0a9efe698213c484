//! Tests for the configuration aggregate accessors.

use chrono::NaiveDate;
use hub_model::{
    AnchorMode, ColumnMapping, DashboardConfig, DataFileFormat, DataSourceLinks, DynamicPeriod,
    ForecastPeriod, ModelConfig, ObservationFormat, PredictionInterval, StaticPeriod, TargetConfig,
    TimeAnchor,
};
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn config_with_intervals(
    prediction: Vec<PredictionInterval>,
    evaluation: Vec<PredictionInterval>,
) -> DashboardConfig {
    DashboardConfig {
        links: DataSourceLinks::default(),
        forecast_periods: vec![
            ForecastPeriod::Static(StaticPeriod {
                period_id: "season-2023".to_string(),
                display_string: "2023/24".to_string(),
                start_date: date(2023, 10, 1),
                end_date: date(2024, 5, 31),
                is_default_selected: false,
            }),
            ForecastPeriod::Static(StaticPeriod {
                period_id: "season-2024".to_string(),
                display_string: "2024/25".to_string(),
                start_date: date(2024, 10, 1),
                end_date: date(2025, 5, 31),
                is_default_selected: true,
            }),
            ForecastPeriod::Dynamic(DynamicPeriod {
                period_id: "last-4-weeks".to_string(),
                display_string: "Last 4 weeks".to_string(),
                time_anchor: TimeAnchor {
                    anchor_mode: AnchorMode::ModelOutput,
                    anchor_on: "season-2024".to_string(),
                    range_calculation: -4,
                },
            }),
        ],
        is_single_location: false,
        single_location: None,
        is_single_target: false,
        targets: vec![
            TargetConfig {
                target_column_in_target_data: "flu_hosp".to_string(),
                corresponding_key_in_model_output: "wk inc flu hosp".to_string(),
                forecast_periods: vec!["season-2024".to_string(), "last-4-weeks".to_string()],
                display_name: "Flu hospitalizations".to_string(),
            },
            TargetConfig {
                target_column_in_target_data: "covid_hosp".to_string(),
                corresponding_key_in_model_output: "wk inc covid hosp".to_string(),
                forecast_periods: vec!["season-2023".to_string()],
                display_name: "covid_hosp".to_string(),
            },
        ],
        time_unit: 7,
        horizons: vec![0, 1, 2, 3],
        column_mapping: ColumnMapping::default(),
        target_data_observation_format: ObservationFormat::Int,
        target_data_file_format: DataFileFormat::Csv,
        models: vec![
            ModelConfig {
                model_name: "hub-ensemble".to_string(),
                color_hex: "#4CAF50".to_string(),
                display_name: "Hub ensemble".to_string(),
            },
            ModelConfig {
                model_name: "hub-baseline".to_string(),
                color_hex: "#2196F3".to_string(),
                display_name: "hub-baseline".to_string(),
            },
        ],
        prediction_intervals: prediction,
        evaluation_intervals: evaluation,
        model_output_naming_standard: "ISODate".to_string(),
        baseline_model: "hub-baseline".to_string(),
        validation_errors: Vec::new(),
        validation_warnings: Vec::new(),
    }
}

#[test]
fn all_quantiles_merges_and_adds_median() {
    let config = config_with_intervals(
        vec![
            PredictionInterval::new(50, vec!["0.25".to_string(), "0.75".to_string()]),
            PredictionInterval::new(95, vec!["0.975".to_string(), "0.025".to_string()]),
        ],
        vec![PredictionInterval::new(
            50,
            vec!["0.75".to_string(), "0.250".to_string()],
        )],
    );
    assert_eq!(
        config.all_quantiles(),
        vec!["0.025", "0.25", "0.5", "0.75", "0.975"]
    );
}

#[test]
fn period_accessors_keep_declaration_order() {
    let config = config_with_intervals(Vec::new(), Vec::new());
    assert_eq!(
        config.all_period_ids(),
        vec!["season-2023", "season-2024", "last-4-weeks"]
    );
    assert_eq!(config.static_periods().count(), 2);
    assert_eq!(config.dynamic_periods().count(), 1);
    assert_eq!(
        config.default_period().map(|p| p.period_id.as_str()),
        Some("season-2024")
    );
    assert!(config.period("last-4-weeks").is_some_and(ForecastPeriod::is_dynamic));
    assert!(config.period("unknown").is_none());
}

#[test]
fn valid_model_targets_follow_target_periods() {
    let config = config_with_intervals(Vec::new(), Vec::new());
    assert_eq!(config.valid_model_targets("season-2024"), vec!["wk inc flu hosp"]);
    assert_eq!(config.valid_model_targets("season-2023"), vec!["wk inc covid hosp"]);
    assert!(config.valid_model_targets("unknown").is_empty());
    assert_eq!(config.model_names(), vec!["hub-ensemble", "hub-baseline"]);
}

fn quantile_level() -> impl Strategy<Value = String> {
    (1u32..1000).prop_map(|n| format!("{}", f64::from(n) / 1000.0))
}

proptest! {
    #[test]
    fn all_quantiles_sorted_and_contains_median(
        display in prop::collection::vec(prop::collection::vec(quantile_level(), 0..6), 0..4),
        evaluation in prop::collection::vec(prop::collection::vec(quantile_level(), 0..6), 0..3),
    ) {
        let to_intervals = |sets: Vec<Vec<String>>| {
            sets.into_iter()
                .enumerate()
                .map(|(idx, ids)| PredictionInterval::new(50 + idx as u32, ids))
                .collect::<Vec<_>>()
        };
        let config = config_with_intervals(to_intervals(display), to_intervals(evaluation));
        let quantiles = config.all_quantiles();

        prop_assert!(quantiles.iter().any(|q| q == "0.5"));
        let values: Vec<f64> = quantiles
            .iter()
            .map(|q| q.parse::<f64>().expect("numeric quantile"))
            .collect();
        prop_assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
