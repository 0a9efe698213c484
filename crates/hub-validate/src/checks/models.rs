use hub_model::ConfigIssue;

use crate::context::ValidationContext;
use crate::draft::{AVAILABLE_MODELS, BASELINE_MODEL, ConfigDraft};

pub fn check(draft: &ConfigDraft, _ctx: &ValidationContext) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    if draft.models.is_empty() {
        issues.push(ConfigIssue::error(
            AVAILABLE_MODELS,
            "At least one model must be defined",
        ));
        return issues;
    }

    let mut seen: Vec<&str> = Vec::new();
    let mut reported: Vec<&str> = Vec::new();
    for model in &draft.models {
        let name = model.model_name.as_str();
        if seen.contains(&name) && !reported.contains(&name) {
            issues.push(ConfigIssue::error(
                AVAILABLE_MODELS,
                format!("Duplicate model '{name}'"),
            ));
            reported.push(name);
        }
        seen.push(name);
    }

    let uncolored: Vec<&str> = draft
        .models
        .iter()
        .filter(|model| model.color_hex.is_none())
        .map(|model| model.model_name.as_str())
        .collect();
    if !uncolored.is_empty() {
        issues.push(ConfigIssue::warning(
            AVAILABLE_MODELS,
            format!(
                "{} model(s) missing color_hex, will use default color palette: {}",
                uncolored.len(),
                uncolored.join(", ")
            ),
        ));
    }
    issues
}

pub fn check_baseline(draft: &ConfigDraft, _ctx: &ValidationContext) -> Vec<ConfigIssue> {
    let Some(baseline) = &draft.baseline_model else {
        return vec![ConfigIssue::error(
            BASELINE_MODEL,
            "baseline_model_for_relative_WIS is required for model evaluation",
        )];
    };
    if draft.models.iter().any(|model| &model.model_name == baseline) {
        return Vec::new();
    }
    let names: Vec<&str> = draft
        .models
        .iter()
        .map(|model| model.model_name.as_str())
        .collect();
    vec![ConfigIssue::error(
        BASELINE_MODEL,
        format!(
            "Baseline model '{baseline}' must be one of the models listed in available_models. \
             Available models: {}",
            names.join(", ")
        ),
    )]
}
