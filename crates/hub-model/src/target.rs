use serde::{Deserialize, Serialize};

/// A modelling task: one observed series and its model-output key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub target_column_in_target_data: String,
    pub corresponding_key_in_model_output: String,
    /// Period ids this target is shown for.
    pub forecast_periods: Vec<String>,
    pub display_name: String,
}

impl TargetConfig {
    pub fn applies_to(&self, period_id: &str) -> bool {
        self.forecast_periods.iter().any(|id| id == period_id)
    }
}
