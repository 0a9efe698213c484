//! Prediction intervals and quantile level helpers.

use serde::{Deserialize, Serialize};

/// The median is always required, whatever the configured intervals say.
pub const MEDIAN_QUANTILE: &str = "0.5";

/// Prefix of the wide-format column holding one quantile level.
const QUANTILE_COLUMN_PREFIX: char = 'q';

/// A central prediction interval built from two or more quantile levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInterval {
    /// Coverage in percent (e.g., 50, 95).
    pub level: u32,
    /// Quantile levels, canonical and sorted ascending by numeric value.
    pub output_type_ids: Vec<String>,
}

impl PredictionInterval {
    /// Build an interval; ids are canonicalised and sorted.
    ///
    /// Ids that are not numeric are kept verbatim and sort last.
    pub fn new(level: u32, output_type_ids: impl IntoIterator<Item = String>) -> Self {
        let mut ids: Vec<String> = output_type_ids
            .into_iter()
            .map(|raw| canonical_quantile(&raw).unwrap_or(raw))
            .collect();
        sort_quantiles(&mut ids);
        ids.dedup();
        Self {
            level,
            output_type_ids: ids,
        }
    }
}

/// Canonical string form of a quantile level ("0.50" -> "0.5", "1.0" -> "1").
///
/// Returns `None` when the value is not a finite number.
pub fn canonical_quantile(raw: &str) -> Option<String> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(format!("{value}"))
}

/// Sort quantile strings ascending by numeric value.
pub fn sort_quantiles(ids: &mut [String]) {
    ids.sort_by(|a, b| quantile_value(a).total_cmp(&quantile_value(b)));
}

fn quantile_value(id: &str) -> f64 {
    id.trim().parse::<f64>().unwrap_or(f64::INFINITY)
}

/// Wide-format column name for a quantile level ("0.5" -> "q0_5").
pub fn quantile_column_name(level: &str) -> String {
    format!("{QUANTILE_COLUMN_PREFIX}{}", level.trim().replace('.', "_"))
}

/// Inverse of [`quantile_column_name`]; `None` for non-quantile columns.
pub fn quantile_from_column_name(column: &str) -> Option<String> {
    let rest = column.strip_prefix(QUANTILE_COLUMN_PREFIX)?;
    if rest.is_empty()
        || !rest.chars().all(|ch| ch.is_ascii_digit() || ch == '_')
        || rest.matches('_').count() > 1
    {
        return None;
    }
    Some(rest.replace('_', "."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalises_numeric_forms() {
        assert_eq!(canonical_quantile("0.50").as_deref(), Some("0.5"));
        assert_eq!(canonical_quantile(" 0.025 ").as_deref(), Some("0.025"));
        assert_eq!(canonical_quantile("1.0").as_deref(), Some("1"));
        assert_eq!(canonical_quantile("abc"), None);
        assert_eq!(canonical_quantile("NaN"), None);
    }

    #[test]
    fn interval_ids_sorted_numerically() {
        let interval = PredictionInterval::new(
            95,
            vec!["0.975".to_string(), "0.025".to_string(), "0.5".to_string()],
        );
        assert_eq!(interval.output_type_ids, vec!["0.025", "0.5", "0.975"]);
    }

    #[test]
    fn column_name_round_trips() {
        assert_eq!(quantile_column_name("0.5"), "q0_5");
        assert_eq!(quantile_column_name("0.025"), "q0_025");
        assert_eq!(quantile_from_column_name("q0_025").as_deref(), Some("0.025"));
        assert_eq!(quantile_from_column_name("quantile"), None);
        assert_eq!(quantile_from_column_name("q"), None);
    }
}
