//! Turning a validated draft into a [`DashboardConfig`].

use std::path::Path;

use hub_model::{
    ConfigIssue, DEFAULT_NAMING_STANDARD, DashboardConfig, DynamicPeriod, ForecastPeriod,
    IssueSeverity, ModelConfig, TargetConfig, TimeAnchor, ValidationReport,
};
use serde_yaml::Value;
use tracing::{error, info, warn};

use crate::checks;
use crate::context::ValidationContext;
use crate::document::normalize_document;
use crate::draft::ConfigDraft;
use crate::error::{ConfigError, Result};

/// Read, parse and validate a configuration file.
pub fn load_config(path: &Path, ctx: &ValidationContext) -> Result<DashboardConfig> {
    let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loading configuration");
    parse_config_str(&yaml, ctx)
}

/// Parse YAML text and validate it.
pub fn parse_config_str(yaml: &str, ctx: &ValidationContext) -> Result<DashboardConfig> {
    if yaml.trim().is_empty() {
        return Err(ConfigError::MalformedDocument {
            reason: "document is empty".to_string(),
        });
    }
    let document: Value = serde_yaml::from_str(yaml)?;
    build_config(&document, ctx)
}

/// Validate a parsed document and construct the configuration.
///
/// Every finding is logged before this returns. Any error finding fails the
/// build with [`ConfigError::InvalidConfiguration`] carrying the full report.
pub fn build_config(document: &Value, ctx: &ValidationContext) -> Result<DashboardConfig> {
    let root = normalize_document(document)?;
    let draft = ConfigDraft::parse(&root);
    let report = checks::run_all(&draft, ctx);
    log_findings(&report);

    if report.has_errors() {
        error!(
            error_count = report.error_count(),
            warning_count = report.warning_count(),
            "configuration validation failed"
        );
        return Err(ConfigError::InvalidConfiguration { report });
    }

    let config = finalize(draft, report, ctx)?;
    info!(
        period_count = config.forecast_periods.len(),
        target_count = config.targets.len(),
        model_count = config.models.len(),
        warning_count = config.validation_warnings.len(),
        "configuration parsed"
    );
    Ok(config)
}

/// Emit every finding through `tracing` at its severity.
pub fn log_findings(report: &ValidationReport) {
    for issue in &report.issues {
        match issue.severity {
            IssueSeverity::Error => error!(field = %issue.field, "{}", issue.message),
            IssueSeverity::Warning => warn!(field = %issue.field, "{}", issue.message),
        }
    }
}

fn finalize(
    draft: ConfigDraft,
    mut report: ValidationReport,
    ctx: &ValidationContext,
) -> Result<DashboardConfig> {
    let mut incomplete = |field: &str| {
        report.push(ConfigIssue::error(
            field,
            format!("'{field}' could not be resolved"),
        ));
        ConfigError::InvalidConfiguration {
            report: report.clone(),
        }
    };

    let time_unit = draft
        .time_unit
        .valid()
        .and_then(|days| u32::try_from(*days).ok())
        .filter(|days| *days >= 1)
        .ok_or_else(|| incomplete("time_unit"))?;
    let horizons = draft
        .horizons
        .valid()
        .cloned()
        .ok_or_else(|| incomplete("horizons"))?;
    let baseline_model = draft
        .baseline_model
        .clone()
        .ok_or_else(|| incomplete("baseline_model_for_relative_WIS"))?;

    let all_period_ids: Vec<String> = draft
        .all_period_ids()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut forecast_periods: Vec<ForecastPeriod> = draft
        .static_periods
        .iter()
        .cloned()
        .map(ForecastPeriod::Static)
        .collect();
    for period in &draft.dynamic_periods {
        let anchor = period.time_anchor.as_ref().and_then(|anchor| {
            Some(TimeAnchor {
                anchor_mode: *anchor.anchor_mode.valid()?,
                anchor_on: anchor.anchor_on.clone()?,
                range_calculation: *anchor.range_calculation.valid()?,
            })
        });
        let Some(time_anchor) = anchor else {
            return Err(incomplete("special_forecast_periods"));
        };
        forecast_periods.push(ForecastPeriod::Dynamic(DynamicPeriod {
            period_id: period.period_id.clone(),
            display_string: period.display_string.clone(),
            time_anchor,
        }));
    }

    let targets = draft
        .targets
        .iter()
        .map(|target| TargetConfig {
            target_column_in_target_data: target.target_column_in_target_data.clone(),
            corresponding_key_in_model_output: target.corresponding_key_in_model_output.clone(),
            forecast_periods: target
                .forecast_periods
                .clone()
                .unwrap_or_else(|| all_period_ids.clone()),
            display_name: target.display_name.clone(),
        })
        .collect();

    let mut color_idx = 0;
    let models = draft
        .models
        .iter()
        .map(|model| {
            let color_hex = model.color_hex.clone().unwrap_or_else(|| {
                let color = ctx.palette.color_for(color_idx).to_string();
                color_idx += 1;
                color
            });
            ModelConfig {
                model_name: model.model_name.clone(),
                color_hex,
                display_name: model.display_name.clone(),
            }
        })
        .collect();

    let single_location = if draft.is_single_location {
        draft.single_location.clone()
    } else {
        None
    };

    Ok(DashboardConfig {
        links: draft.links,
        forecast_periods,
        is_single_location: draft.is_single_location,
        single_location,
        is_single_target: draft.is_single_target,
        targets,
        time_unit,
        horizons,
        column_mapping: draft.column_mapping,
        target_data_observation_format: draft.observation_format.valid().copied().unwrap_or_default(),
        target_data_file_format: draft.file_format.valid().copied().unwrap_or_default(),
        models,
        prediction_intervals: draft.prediction_intervals,
        evaluation_intervals: draft.evaluation_intervals,
        model_output_naming_standard: draft
            .naming_standard
            .unwrap_or_else(|| DEFAULT_NAMING_STANDARD.to_string()),
        baseline_model,
        validation_errors: Vec::new(),
        validation_warnings: report.warnings().cloned().collect(),
    })
}
