//! Typed, still-unvalidated view of a configuration document.
//!
//! Parsing never fails: malformed entries become findings in
//! [`ConfigDraft::parse_issues`] and are left out of the draft so the
//! remaining rules can still run over everything else.

use chrono::NaiveDate;
use hub_model::{
    AnchorMode, ColumnMapping, ConfigIssue, DataFileFormat, DataSourceLinks, ObservationFormat,
    PredictionInterval, StaticPeriod, columns, parse_iso_date,
};

use crate::document::{Entries, Node};

pub const LINKS: &str = "links_to_hubverse_compatible_data";
pub const FORECAST_PERIODS: &str = "forecast_periods";
pub const SPECIAL_FORECAST_PERIODS: &str = "special_forecast_periods";
pub const IS_SINGLE_LOCATION: &str = "is_single_location_forecast";
pub const SINGLE_LOCATION_MAPPING: &str = "single_location_mapping";
pub const IS_SINGLE_TARGET: &str = "is_single_forecast_target";
pub const TARGETS: &str = "targets";
pub const TIME_UNIT: &str = "time_unit";
pub const HORIZONS: &str = "horizons";
pub const TARGET_DATA_HEADER_MAPPING: &str = "target_data_header_mapping";
pub const MODEL_OUTPUT_HEADER_MAPPING: &str = "model_output_data_header_mapping";
pub const OBSERVATION_FORMAT: &str = "target_data_observation_format";
pub const FILE_FORMAT: &str = "target_data_file_format";
pub const AVAILABLE_MODELS: &str = "available_models";
pub const PREDICTION_INTERVALS: &str = "prediction_intervals";
pub const EVALUATION_INTERVALS: &str = "evaluations_prediction_intervals";
pub const NAMING_STANDARD: &str = "model_output_data_file_naming_standard";
pub const BASELINE_MODEL: &str = "baseline_model_for_relative_WIS";

const KNOWN_KEYS: [&str; 18] = [
    LINKS,
    FORECAST_PERIODS,
    SPECIAL_FORECAST_PERIODS,
    IS_SINGLE_LOCATION,
    SINGLE_LOCATION_MAPPING,
    IS_SINGLE_TARGET,
    TARGETS,
    TIME_UNIT,
    HORIZONS,
    TARGET_DATA_HEADER_MAPPING,
    MODEL_OUTPUT_HEADER_MAPPING,
    OBSERVATION_FORMAT,
    FILE_FORMAT,
    AVAILABLE_MODELS,
    PREDICTION_INTERVALS,
    EVALUATION_INTERVALS,
    NAMING_STANDARD,
    BASELINE_MODEL,
];

/// A configuration value that may be absent, usable, or present but wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Missing,
    Valid(T),
    /// Raw rendering of the rejected value.
    Invalid(String),
}

impl<T> Field<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Field::Valid(value) => Some(value),
            Field::Missing | Field::Invalid(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeAnchorDraft {
    pub anchor_mode: Field<AnchorMode>,
    pub anchor_on: Option<String>,
    pub range_calculation: Field<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicPeriodDraft {
    pub period_id: String,
    pub display_string: String,
    pub time_anchor: Option<TimeAnchorDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDraft {
    pub target_column_in_target_data: String,
    pub corresponding_key_in_model_output: String,
    /// `None` when `for_forecast_periods` was omitted.
    pub forecast_periods: Option<Vec<String>>,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDraft {
    pub model_name: String,
    pub color_hex: Option<String>,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDraft {
    pub links: DataSourceLinks,
    pub static_periods: Vec<StaticPeriod>,
    pub dynamic_periods: Vec<DynamicPeriodDraft>,
    pub is_single_location: bool,
    pub single_location: Option<String>,
    pub is_single_target: bool,
    pub targets: Vec<TargetDraft>,
    pub time_unit: Field<i64>,
    pub horizons: Field<Vec<i64>>,
    pub column_mapping: ColumnMapping,
    pub observation_format: Field<ObservationFormat>,
    pub file_format: Field<DataFileFormat>,
    pub models: Vec<ModelDraft>,
    pub prediction_intervals: Vec<PredictionInterval>,
    pub evaluation_intervals: Vec<PredictionInterval>,
    pub naming_standard: Option<String>,
    pub baseline_model: Option<String>,
    /// Findings raised while reading entries, in document order.
    pub parse_issues: Vec<ConfigIssue>,
}

impl ConfigDraft {
    pub fn parse(root: &Entries) -> Self {
        let mut issues = Vec::new();
        check_root_keys(root, &mut issues);

        let links = parse_links(root);
        let static_periods = parse_static_periods(root, &mut issues);
        let dynamic_periods = parse_dynamic_periods(root, &mut issues);
        let is_single_location = parse_flag(root, IS_SINGLE_LOCATION, &mut issues);
        let single_location = root
            .get_present(SINGLE_LOCATION_MAPPING)
            .and_then(Node::scalar_text);
        let is_single_target = parse_flag(root, IS_SINGLE_TARGET, &mut issues);
        let targets = parse_targets(root, &mut issues);
        let time_unit = match root.get_present(TIME_UNIT) {
            None => Field::Missing,
            Some(node) => node
                .as_i64()
                .map_or_else(|| Field::Invalid(node.describe()), Field::Valid),
        };
        let horizons = parse_horizons(root);
        let column_mapping = parse_column_mapping(root);
        let observation_format = parse_enum_field(root, OBSERVATION_FORMAT);
        let file_format = parse_enum_field(root, FILE_FORMAT);
        let models = parse_models(root, &mut issues);
        let prediction_intervals = parse_intervals(root, PREDICTION_INTERVALS, false, &mut issues);
        let evaluation_intervals = parse_intervals(root, EVALUATION_INTERVALS, true, &mut issues);
        let naming_standard = root.get_present(NAMING_STANDARD).and_then(Node::scalar_text);
        let baseline_model = root.get_present(BASELINE_MODEL).and_then(Node::scalar_text);

        Self {
            links,
            static_periods,
            dynamic_periods,
            is_single_location,
            single_location,
            is_single_target,
            targets,
            time_unit,
            horizons,
            column_mapping,
            observation_format,
            file_format,
            models,
            prediction_intervals,
            evaluation_intervals,
            naming_standard,
            baseline_model,
            parse_issues: issues,
        }
    }

    /// Every period id, statics first, in declaration order.
    pub fn all_period_ids(&self) -> Vec<&str> {
        self.static_periods
            .iter()
            .map(|period| period.period_id.as_str())
            .chain(
                self.dynamic_periods
                    .iter()
                    .map(|period| period.period_id.as_str()),
            )
            .collect()
    }

    pub fn static_period(&self, period_id: &str) -> Option<&StaticPeriod> {
        self.static_periods
            .iter()
            .find(|period| period.period_id == period_id)
    }
}

fn check_root_keys(root: &Entries, issues: &mut Vec<ConfigIssue>) {
    let mut seen: Vec<&str> = Vec::new();
    for (key, _) in root.iter() {
        if !KNOWN_KEYS.contains(&key) {
            issues.push(ConfigIssue::warning(
                key,
                format!("Unknown configuration key '{key}' is ignored"),
            ));
        } else if seen.contains(&key) {
            issues.push(ConfigIssue::warning(
                key,
                format!("'{key}' is defined more than once; the first definition is used"),
            ));
        }
        seen.push(key);
    }
}

/// Named entries of a root section (`- name: [props...]`).
fn section<'a>(
    root: &'a Entries,
    key: &str,
    issues: &mut Vec<ConfigIssue>,
) -> Vec<(&'a str, &'a Node)> {
    match root.get(key) {
        None | Some(Node::Null) => Vec::new(),
        Some(Node::List(items)) if items.is_empty() => Vec::new(),
        Some(Node::Map(entries)) => entries.iter().collect(),
        Some(other) => {
            issues.push(ConfigIssue::error(
                key,
                format!("'{key}' must be a list of named entries, found {}", other.describe()),
            ));
            Vec::new()
        }
    }
}

/// Properties of one section entry; `null` means "no properties".
fn properties<'a>(
    field: &str,
    name: &str,
    node: &'a Node,
    issues: &mut Vec<ConfigIssue>,
) -> Option<Option<&'a Entries>> {
    match node {
        Node::Map(entries) => Some(Some(entries)),
        Node::Null => Some(None),
        other => {
            issues.push(ConfigIssue::error(
                field,
                format!(
                    "Entry '{name}' must be a list of properties, found {}",
                    other.describe()
                ),
            ));
            None
        }
    }
}

fn text(props: Option<&Entries>, key: &str) -> Option<String> {
    props
        .and_then(|props| props.get_present(key))
        .and_then(Node::scalar_text)
}

fn required_text(
    props: Option<&Entries>,
    key: &str,
    field: &str,
    kind: &str,
    name: &str,
    issues: &mut Vec<ConfigIssue>,
) -> Option<String> {
    let value = text(props, key);
    if value.is_none() {
        issues.push(ConfigIssue::error(
            field,
            format!("Missing required field '{key}' in {kind} '{name}'"),
        ));
    }
    value
}

fn required_date(
    props: Option<&Entries>,
    key: &str,
    name: &str,
    issues: &mut Vec<ConfigIssue>,
) -> Option<NaiveDate> {
    let raw = required_text(props, key, FORECAST_PERIODS, "forecast period", name, issues)?;
    let date = parse_iso_date(&raw);
    if date.is_none() {
        issues.push(ConfigIssue::error(
            FORECAST_PERIODS,
            format!("Invalid {key} '{raw}' in forecast period '{name}'; expected YYYY-MM-DD"),
        ));
    }
    date
}

fn parse_links(root: &Entries) -> DataSourceLinks {
    let props = root.get(LINKS).and_then(Node::as_entries);
    DataSourceLinks {
        target_data_link: text(props, "target_data_link"),
        model_output_link: text(props, "model_output_link"),
    }
}

fn parse_static_periods(root: &Entries, issues: &mut Vec<ConfigIssue>) -> Vec<StaticPeriod> {
    let mut periods = Vec::new();
    for (name, node) in section(root, FORECAST_PERIODS, issues) {
        let Some(props) = properties(FORECAST_PERIODS, name, node, issues) else {
            continue;
        };
        let period_id = text(props, "forecast_period_id").unwrap_or_else(|| name.to_string());
        let display_string =
            required_text(props, "display_string", FORECAST_PERIODS, "forecast period", name, issues);
        let start_date = required_date(props, "start_date", name, issues);
        let end_date = required_date(props, "end_date", name, issues);
        let is_default_selected = match props.and_then(|props| props.get_present("is_default_selected")) {
            None => false,
            Some(node) => node.as_bool().unwrap_or_else(|| {
                issues.push(ConfigIssue::error(
                    FORECAST_PERIODS,
                    format!(
                        "'is_default_selected' in forecast period '{name}' must be true or false, found {}",
                        node.describe()
                    ),
                ));
                false
            }),
        };
        let (Some(display_string), Some(start_date), Some(end_date)) =
            (display_string, start_date, end_date)
        else {
            continue;
        };
        tracing::debug!(period_id = %period_id, "parsed forecast period");
        periods.push(StaticPeriod {
            period_id,
            display_string,
            start_date,
            end_date,
            is_default_selected,
        });
    }
    periods
}

fn parse_dynamic_periods(
    root: &Entries,
    issues: &mut Vec<ConfigIssue>,
) -> Vec<DynamicPeriodDraft> {
    let mut periods = Vec::new();
    for (name, node) in section(root, SPECIAL_FORECAST_PERIODS, issues) {
        let Some(props) = properties(SPECIAL_FORECAST_PERIODS, name, node, issues) else {
            continue;
        };
        let period_id = text(props, "special_period_id").unwrap_or_else(|| name.to_string());
        let Some(display_string) = required_text(
            props,
            "display_string",
            SPECIAL_FORECAST_PERIODS,
            "special period",
            name,
            issues,
        ) else {
            continue;
        };
        let time_anchor = props
            .and_then(|props| props.get_present("time_anchor"))
            .map(parse_time_anchor);
        tracing::debug!(period_id = %period_id, "parsed special period");
        periods.push(DynamicPeriodDraft {
            period_id,
            display_string,
            time_anchor,
        });
    }
    periods
}

fn parse_time_anchor(node: &Node) -> TimeAnchorDraft {
    let props = node.as_entries();
    let anchor_mode = match props.and_then(|props| props.get_present("anchor_mode")) {
        None => Field::Missing,
        Some(node) => {
            let raw = node.describe();
            raw.parse::<AnchorMode>()
                .map_or(Field::Invalid(raw), Field::Valid)
        }
    };
    let range_calculation = match props.and_then(|props| props.get_present("range_calculation")) {
        None => Field::Missing,
        Some(node) => node
            .as_i64()
            .map_or_else(|| Field::Invalid(node.describe()), Field::Valid),
    };
    TimeAnchorDraft {
        anchor_mode,
        anchor_on: text(props, "anchor_on"),
        range_calculation,
    }
}

fn parse_flag(root: &Entries, key: &str, issues: &mut Vec<ConfigIssue>) -> bool {
    match root.get_present(key) {
        None => false,
        Some(node) => node.as_bool().unwrap_or_else(|| {
            issues.push(ConfigIssue::error(
                key,
                format!("'{key}' must be true or false, found {}", node.describe()),
            ));
            false
        }),
    }
}

fn string_list(node: &Node) -> Vec<String> {
    match node {
        Node::List(items) => items.iter().filter_map(Node::scalar_text).collect(),
        other => other.scalar_text().into_iter().collect(),
    }
}

fn parse_targets(root: &Entries, issues: &mut Vec<ConfigIssue>) -> Vec<TargetDraft> {
    let mut targets = Vec::new();
    for (name, node) in section(root, TARGETS, issues) {
        let Some(props) = properties(TARGETS, name, node, issues) else {
            continue;
        };
        let Some(model_key) = required_text(
            props,
            "corresponding_key_in_model_output_target_column",
            TARGETS,
            "target",
            name,
            issues,
        ) else {
            continue;
        };
        let forecast_periods = props
            .and_then(|props| props.get_present("for_forecast_periods"))
            .map(string_list)
            .filter(|ids| !ids.is_empty());
        tracing::debug!(target_key = %name, model_key = %model_key, "parsed target");
        targets.push(TargetDraft {
            target_column_in_target_data: name.to_string(),
            corresponding_key_in_model_output: model_key,
            forecast_periods,
            display_name: text(props, "display_name").unwrap_or_else(|| name.to_string()),
        });
    }
    targets
}

fn parse_horizons(root: &Entries) -> Field<Vec<i64>> {
    match root.get_present(HORIZONS) {
        None => Field::Missing,
        Some(Node::List(items)) => items
            .iter()
            .map(Node::as_i64)
            .collect::<Option<Vec<_>>>()
            .map_or_else(|| Field::Invalid("a list with non-integer items".to_string()), Field::Valid),
        Some(other) => Field::Invalid(other.describe()),
    }
}

fn parse_column_mapping(root: &Entries) -> ColumnMapping {
    let target = root.get(TARGET_DATA_HEADER_MAPPING).and_then(Node::as_entries);
    let model = root.get(MODEL_OUTPUT_HEADER_MAPPING).and_then(Node::as_entries);
    let defaults = ColumnMapping::default();

    let location_col = text(target, "location_col_name");
    let model_location_col = text(model, "location_col_name")
        .or_else(|| location_col.clone())
        .or_else(|| Some(columns::LOCATION.to_string()));

    ColumnMapping {
        date_col: text(target, "date_col_name").unwrap_or(defaults.date_col),
        observation_col: text(target, "observation_col_name").unwrap_or(defaults.observation_col),
        location_col,
        location_name_col: text(target, "location_name_col_name"),
        target_col: text(target, "target_col_name"),
        as_of_col: text(target, "as_of_col_name"),
        reference_date_col: text(model, "reference_date_col_name")
            .unwrap_or(defaults.reference_date_col),
        target_end_date_col: text(model, "target_end_date_col_name")
            .unwrap_or(defaults.target_end_date_col),
        model_target_col: text(model, "target_col_name").or(defaults.model_target_col),
        horizon_col: text(model, "horizon_col_name").or(defaults.horizon_col),
        model_location_col,
        output_type_col: text(model, "output_type_col_name").unwrap_or(defaults.output_type_col),
        output_type_id_col: text(model, "output_type_id_col_name")
            .unwrap_or(defaults.output_type_id_col),
        value_col: text(model, "value_col_name").unwrap_or(defaults.value_col),
    }
}

fn parse_enum_field<T: std::str::FromStr>(root: &Entries, key: &str) -> Field<T> {
    match root.get_present(key).and_then(Node::scalar_text) {
        None => Field::Missing,
        Some(raw) => raw.parse::<T>().map_or(Field::Invalid(raw), Field::Valid),
    }
}

fn parse_models(root: &Entries, issues: &mut Vec<ConfigIssue>) -> Vec<ModelDraft> {
    let mut models = Vec::new();
    for (name, node) in section(root, AVAILABLE_MODELS, issues) {
        let Some(props) = properties(AVAILABLE_MODELS, name, node, issues) else {
            continue;
        };
        tracing::debug!(model = %name, "parsed model");
        models.push(ModelDraft {
            model_name: name.to_string(),
            color_hex: text(props, "color_hex"),
            display_name: text(props, "display_name").unwrap_or_else(|| name.to_string()),
        });
    }
    models
}

/// Invalid evaluation intervals are only warnings; they never block a build.
fn parse_intervals(
    root: &Entries,
    key: &str,
    lenient: bool,
    issues: &mut Vec<ConfigIssue>,
) -> Vec<PredictionInterval> {
    let finding = |message: String| {
        if lenient {
            ConfigIssue::warning(key, message)
        } else {
            ConfigIssue::error(key, message)
        }
    };
    let mut intervals = Vec::new();
    for (name, node) in section(root, key, issues) {
        let Ok(level) = name.parse::<u32>() else {
            issues.push(finding(format!(
                "Invalid interval level '{name}'; expected an integer percentage"
            )));
            continue;
        };
        let ids = node
            .as_entries()
            .and_then(|props| props.get_present("uses_output_type_ids"))
            .map(string_list)
            .unwrap_or_default();
        if ids.is_empty() {
            issues.push(finding(format!(
                "Interval '{name}' is missing 'uses_output_type_ids'"
            )));
            continue;
        }
        intervals.push(PredictionInterval::new(level, ids));
    }
    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::normalize_document;

    fn draft(yaml: &str) -> ConfigDraft {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).expect("valid yaml");
        ConfigDraft::parse(&normalize_document(&value).expect("normalise"))
    }

    #[test]
    fn static_period_id_defaults_to_entry_key() {
        let draft = draft(
            "- forecast_periods:\n    - season-2024:\n        - display_string: 2024/25\n        - start_date: 2024-10-01\n        - end_date: 2025-05-31\n",
        );
        assert!(draft.parse_issues.is_empty());
        assert_eq!(draft.static_periods[0].period_id, "season-2024");
        assert_eq!(draft.static_periods[0].display_string, "2024/25");
    }

    #[test]
    fn missing_period_fields_become_findings() {
        let draft = draft(
            "- forecast_periods:\n    - broken:\n        - start_date: not-a-date\n",
        );
        assert!(draft.static_periods.is_empty());
        let messages: Vec<&str> = draft
            .parse_issues
            .iter()
            .map(|issue| issue.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Missing required field 'display_string' in forecast period 'broken'",
                "Invalid start_date 'not-a-date' in forecast period 'broken'; expected YYYY-MM-DD",
                "Missing required field 'end_date' in forecast period 'broken'",
            ]
        );
    }

    #[test]
    fn model_location_falls_back_to_target_location() {
        let draft = draft(
            "- target_data_header_mapping:\n    - location_col_name: fips\n    - date_col_name: week_ending\n",
        );
        let mapping = &draft.column_mapping;
        assert_eq!(mapping.date_col, "week_ending");
        assert_eq!(mapping.location_col.as_deref(), Some("fips"));
        assert_eq!(mapping.model_location_col.as_deref(), Some("fips"));
        assert_eq!(mapping.observation_col, "value");
    }

    #[test]
    fn range_calculation_must_be_yaml_integer() {
        let draft = draft(
            "- special_forecast_periods:\n    - recent:\n        - display_string: Recent\n        - time_anchor:\n            - anchor_mode: model-output\n            - range_calculation: \"-4\"\n",
        );
        let anchor = draft.dynamic_periods[0]
            .time_anchor
            .as_ref()
            .expect("anchor");
        assert_eq!(anchor.anchor_mode, Field::Valid(AnchorMode::ModelOutput));
        assert_eq!(anchor.range_calculation, Field::Invalid("-4".to_string()));
        assert_eq!(anchor.anchor_on, None);
    }

    #[test]
    fn unknown_root_keys_warn() {
        let draft = draft("- time_unit: 7\n- colour_scheme: dark\n");
        assert_eq!(draft.time_unit, Field::Valid(7));
        assert_eq!(draft.parse_issues.len(), 1);
        assert!(!draft.parse_issues[0].is_error());
        assert_eq!(draft.parse_issues[0].field, "colour_scheme");
    }
}
