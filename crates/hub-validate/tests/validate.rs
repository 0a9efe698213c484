//! Tests for configuration validation and construction.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::NaiveDate;
use hub_model::{
    AnchorMode, DEFAULT_COLOR_PALETTE, DataFileFormat, ForecastPeriod, IssueSeverity,
    LocalDataDirs, LocationReference, ObservationFormat,
};
use hub_validate::{ConfigError, ValidationContext, load_config, parse_config_str};

const BASE_CONFIG: &str = r##"
- links_to_hubverse_compatible_data:
    - target_data_link:
    - model_output_link:
- forecast_periods:
    - season-2023:
        - display_string: "2023/24 season"
        - start_date: 2023-10-01
        - end_date: 2024-05-31
    - season-2024:
        - display_string: "2024/25 season"
        - start_date: 2024-10-01
        - end_date: 2099-05-31
        - is_default_selected: true
- special_forecast_periods:
    - recent:
        - special_period_id: last-4-weeks
        - display_string: "Last 4 weeks"
        - time_anchor:
            - anchor_mode: model-output
            - anchor_on: season-2024
            - range_calculation: -4
- is_single_location_forecast: false
- is_single_forecast_target: false
- targets:
    - flu_hosp:
        - corresponding_key_in_model_output_target_column: wk inc flu hosp
        - for_forecast_periods: [season-2023, season-2024, last-4-weeks]
        - display_name: Flu hospitalizations
- time_unit: 7
- horizons: [0, 1, 2, 3]
- target_data_header_mapping:
    - date_col_name: date
    - observation_col_name: value
    - location_col_name: location
    - location_name_col_name: location_name
- target_data_observation_format: int
- target_data_file_format: csv
- available_models:
    - hub-ensemble:
        - color_hex: "#000000"
    - hub-baseline:
        - display_name: Baseline
- prediction_intervals:
    - 50:
        - uses_output_type_ids: [0.25, 0.75]
    - 95:
        - uses_output_type_ids: [0.025, 0.975]
- evaluations_prediction_intervals:
    - 50:
        - uses_output_type_ids: [0.25, 0.75]
- model_output_data_file_naming_standard: ISODate
- baseline_model_for_relative_WIS: hub-baseline
"##;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn context() -> ValidationContext {
    let mut names = BTreeMap::new();
    names.insert("01".to_string(), "Alabama".to_string());
    names.insert("US".to_string(), "United States".to_string());
    ValidationContext::new(date(2025, 1, 15)).with_locations(LocationReference::new(names))
}

fn with(from: &str, to: &str) -> String {
    assert!(BASE_CONFIG.contains(from), "fixture does not contain {from:?}");
    BASE_CONFIG.replacen(from, to, 1)
}

fn expect_invalid(yaml: &str, ctx: &ValidationContext) -> hub_model::ValidationReport {
    match parse_config_str(yaml, ctx) {
        Err(ConfigError::InvalidConfiguration { report }) => report,
        other => panic!("expected invalid configuration, got {other:?}"),
    }
}

#[test]
fn builds_complete_configuration() {
    let config = parse_config_str(BASE_CONFIG, &context()).expect("valid config");

    assert_eq!(config.time_unit, 7);
    assert_eq!(config.horizons, vec![0, 1, 2, 3]);
    assert_eq!(
        config.all_period_ids(),
        vec!["season-2023", "season-2024", "last-4-weeks"]
    );
    assert_eq!(
        config.default_period().map(|p| p.period_id.as_str()),
        Some("season-2024")
    );
    let dynamic = config
        .period("last-4-weeks")
        .and_then(ForecastPeriod::as_dynamic)
        .expect("dynamic period");
    assert_eq!(dynamic.time_anchor.anchor_mode, AnchorMode::ModelOutput);
    assert_eq!(dynamic.time_anchor.range_calculation, -4);

    assert_eq!(config.models[0].color_hex, "#000000");
    assert_eq!(config.models[1].color_hex, DEFAULT_COLOR_PALETTE[0]);
    assert_eq!(config.models[1].display_name, "Baseline");
    assert_eq!(config.models[0].display_name, "hub-ensemble");

    assert_eq!(
        config.all_quantiles(),
        vec!["0.025", "0.25", "0.5", "0.75", "0.975"]
    );
    assert_eq!(config.target_data_observation_format, ObservationFormat::Int);
    assert_eq!(config.target_data_file_format, DataFileFormat::Csv);
    assert_eq!(config.column_mapping.model_location_col.as_deref(), Some("location"));
    assert!(config.links.target_data_link.is_none());
    assert!(config.validation_errors.is_empty());
    assert_eq!(config.validation_warnings.len(), 1);
    assert_eq!(config.validation_warnings[0].field, "available_models");
}

#[test]
fn duplicate_period_id_reported_once_naming_both_sections() {
    let yaml = with(
        "special_period_id: last-4-weeks",
        "special_period_id: season-2024",
    );
    let report = expect_invalid(&yaml, &context());
    let duplicates: Vec<_> = report
        .errors()
        .filter(|issue| issue.message.contains("Duplicate period_id"))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(
        duplicates[0].message,
        "Duplicate period_id 'season-2024' is defined 2 times (in forecast_periods, special_forecast_periods)"
    );
}

#[test]
fn single_location_without_mapping_is_one_error() {
    let yaml = with(
        "is_single_location_forecast: false",
        "is_single_location_forecast: true",
    );
    let report = expect_invalid(&yaml, &context());
    assert_eq!(report.error_count(), 1);
    let issue = report.errors().next().expect("one error");
    assert_eq!(issue.field, "single_location_mapping");
}

#[test]
fn single_location_unknown_code_warns() {
    let yaml = with(
        "- is_single_location_forecast: false",
        "- is_single_location_forecast: true\n- single_location_mapping: \"72\"",
    );
    let config = parse_config_str(&yaml, &context()).expect("valid config");
    assert_eq!(config.single_location.as_deref(), Some("72"));
    assert!(
        config
            .validation_warnings
            .iter()
            .any(|issue| issue.field == "single_location_mapping")
    );
}

#[test]
fn multi_location_never_requires_mapping() {
    let config = parse_config_str(BASE_CONFIG, &context()).expect("valid config");
    assert!(!config.is_single_location);
    assert!(config.single_location.is_none());
}

#[test]
fn twelve_uncolored_models_wrap_the_palette() {
    let models: String = (1..=12)
        .map(|idx| format!("    - model-{idx:02}:\n        - display_name: Model {idx}\n"))
        .collect();
    let yaml = with(
        "    - hub-ensemble:\n        - color_hex: \"#000000\"\n    - hub-baseline:\n        - display_name: Baseline\n",
        &models,
    )
    .replace(
        "baseline_model_for_relative_WIS: hub-baseline",
        "baseline_model_for_relative_WIS: model-01",
    );
    let config = parse_config_str(&yaml, &context()).expect("valid config");

    assert_eq!(config.models.len(), 12);
    assert_eq!(config.models[0].color_hex, DEFAULT_COLOR_PALETTE[0]);
    assert_eq!(config.models[9].color_hex, DEFAULT_COLOR_PALETTE[9]);
    assert_eq!(config.models[10].color_hex, DEFAULT_COLOR_PALETTE[0]);
    assert_eq!(config.models[11].color_hex, DEFAULT_COLOR_PALETTE[1]);
    let batch: Vec<_> = config
        .validation_warnings
        .iter()
        .filter(|issue| issue.field == "available_models")
        .collect();
    assert_eq!(batch.len(), 1);
    assert!(batch[0].message.starts_with("12 model(s) missing color_hex"));
}

#[test]
fn frozen_anchor_warns_but_builds() {
    let ctx = context();
    let late = ValidationContext::new(date(2100, 1, 1)).with_locations(ctx.locations.clone());
    let config = parse_config_str(BASE_CONFIG, &late).expect("valid config");
    assert!(
        config
            .validation_warnings
            .iter()
            .any(|issue| issue.field == "special_forecast_periods"
                && issue.message.contains("It will not update"))
    );
}

#[test]
fn positive_range_calculation_is_error() {
    let yaml = with("range_calculation: -4", "range_calculation: 2");
    let report = expect_invalid(&yaml, &context());
    assert_eq!(report.error_count(), 1);
    assert!(
        report
            .errors()
            .all(|issue| issue.field == "special_forecast_periods")
    );
}

#[test]
fn anchor_on_must_name_static_period() {
    let yaml = with("anchor_on: season-2024", "anchor_on: season-2030");
    let report = expect_invalid(&yaml, &context());
    let messages: Vec<&str> = report.errors().map(|issue| issue.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["Special period 'last-4-weeks' anchors on an undefined forecast period 'season-2030'"]
    );
}

#[test]
fn invalid_anchor_mode_and_missing_anchor_on() {
    let yaml = with(
        "            - anchor_mode: model-output\n            - anchor_on: season-2024\n",
        "            - anchor_mode: latest\n",
    );
    let report = expect_invalid(&yaml, &context());
    assert_eq!(report.error_count(), 2);
}

#[test]
fn time_unit_rules() {
    let report = expect_invalid(&with("time_unit: 7", "time_unit: 0"), &context());
    let issue = report.errors().next().expect("error");
    insta::assert_snapshot!(issue.to_string(), @"[time_unit] ERROR: time_unit must be at least 1 day (got 0)");

    let config = parse_config_str(&with("time_unit: 7", "time_unit: 30"), &context())
        .expect("large time unit is only a warning");
    assert_eq!(config.time_unit, 30);
    assert!(
        config
            .validation_warnings
            .iter()
            .any(|issue| issue.field == "time_unit")
    );

    let report = expect_invalid(&with("- time_unit: 7\n", ""), &context());
    assert!(report.errors().any(|issue| issue.field == "time_unit"));
}

#[test]
fn empty_horizons_is_error() {
    let report = expect_invalid(&with("horizons: [0, 1, 2, 3]", "horizons: []"), &context());
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.errors().next().map(|i| i.field.as_str()), Some("horizons"));
}

#[test]
fn target_without_periods_defaults_to_all() {
    let yaml = with(
        "        - for_forecast_periods: [season-2023, season-2024, last-4-weeks]\n",
        "",
    );
    let config = parse_config_str(&yaml, &context()).expect("valid config");
    assert_eq!(
        config.targets[0].forecast_periods,
        vec!["season-2023", "season-2024", "last-4-weeks"]
    );
    assert!(
        config
            .validation_warnings
            .iter()
            .any(|issue| issue.field == "targets")
    );
}

#[test]
fn target_period_references_must_exist() {
    let yaml = with(
        "for_forecast_periods: [season-2023, season-2024, last-4-weeks]",
        "for_forecast_periods: [season-2023, season-2019]",
    );
    let report = expect_invalid(&yaml, &context());
    let messages: Vec<&str> = report.errors().map(|issue| issue.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["Target 'flu_hosp' references undefined forecast period: 'season-2019'"]
    );
}

#[test]
fn baseline_must_be_configured_model() {
    let yaml = with(
        "baseline_model_for_relative_WIS: hub-baseline",
        "baseline_model_for_relative_WIS: persistence",
    );
    let report = expect_invalid(&yaml, &context());
    assert_eq!(report.error_count(), 1);
    assert_eq!(
        report.errors().next().map(|i| i.field.as_str()),
        Some("baseline_model_for_relative_WIS")
    );
}

#[test]
fn start_after_end_is_error() {
    let yaml = with("start_date: 2023-10-01", "start_date: 2024-10-01");
    let report = expect_invalid(&yaml, &context());
    assert!(
        report
            .errors()
            .any(|issue| issue.message.starts_with("start_date is after end_date for period 'season-2023'"))
    );
}

#[test]
fn column_mapping_conflict_is_error() {
    let yaml = with(
        "    - location_name_col_name: location_name\n",
        "    - location_name_col_name: location\n",
    );
    let report = expect_invalid(&yaml, &context());
    assert_eq!(report.error_count(), 1);
    assert_eq!(
        report.errors().next().map(|i| i.field.as_str()),
        Some("column_mapping")
    );
}

#[test]
fn observation_format_default_and_unknown() {
    let config = parse_config_str(&with("- target_data_observation_format: int\n", ""), &context())
        .expect("valid config");
    assert_eq!(config.target_data_observation_format, ObservationFormat::Float);
    assert!(
        config
            .validation_warnings
            .iter()
            .any(|issue| issue.field == "target_data_observation_format")
    );

    let report = expect_invalid(
        &with("target_data_observation_format: int", "target_data_observation_format: decimal"),
        &context(),
    );
    assert_eq!(report.error_count(), 1);
}

#[test]
fn online_links_conflict_with_local_directories() {
    let yaml = with(
        "    - target_data_link:\n",
        "    - target_data_link: https://example.org/target-data.csv\n",
    );
    let ctx = context().with_local_dirs(LocalDataDirs {
        target_data: true,
        model_output: false,
    });
    let report = expect_invalid(&yaml, &ctx);
    assert_eq!(report.errors().next().map(|i| i.field.as_str()), Some("data_source"));

    let config = parse_config_str(&yaml, &context()).expect("online only is fine");
    assert!(config.links.is_online());
}

#[test]
fn findings_keep_rule_order() {
    let yaml = with("time_unit: 7", "time_unit: 0").replace(
        "baseline_model_for_relative_WIS: hub-baseline",
        "baseline_model_for_relative_WIS: persistence",
    );
    let report = expect_invalid(&yaml, &context());
    let fields: Vec<&str> = report.issues.iter().map(|i| i.field.as_str()).collect();
    assert_eq!(
        fields,
        vec!["time_unit", "available_models", "baseline_model_for_relative_WIS"]
    );
    assert_eq!(report.issues[1].severity, IssueSeverity::Warning);
}

#[test]
fn malformed_documents_rejected() {
    let err = parse_config_str("time_unit: 7\nhorizons: [1]\n", &context()).unwrap_err();
    assert!(matches!(err, ConfigError::MalformedDocument { .. }));

    let err = parse_config_str("   \n", &context()).unwrap_err();
    assert!(matches!(err, ConfigError::MalformedDocument { .. }));

    let err = parse_config_str("- [unclosed\n", &context()).unwrap_err();
    assert!(matches!(err, ConfigError::Yaml { .. }));
}

#[test]
fn load_config_reads_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(BASE_CONFIG.as_bytes()).expect("write config");
    let config = load_config(file.path(), &context()).expect("load config");
    assert_eq!(config.baseline_model, "hub-baseline");

    let missing = file.path().with_extension("missing.yaml");
    let err = load_config(&missing, &context()).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
