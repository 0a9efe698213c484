//! Location code reference and reconciled location entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name used when a location code is not known to the reference.
pub const UNKNOWN_LOCATION_NAME: &str = "Unknown";

/// Read-only `code -> name` lookup (US state FIPS codes by default).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationReference {
    names: BTreeMap<String, String>,
}

impl LocationReference {
    pub fn new(names: BTreeMap<String, String>) -> Self {
        Self { names }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up a code; purely numeric codes are zero-padded to two digits.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.names
            .get(&normalize_code(code))
            .map(String::as_str)
    }

    pub fn name_or_unknown(&self, code: &str) -> &str {
        self.get(code).unwrap_or(UNKNOWN_LOCATION_NAME)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn normalize_code(code: &str) -> String {
    let code = code.trim();
    if !code.is_empty() && code.len() < 2 && code.chars().all(|ch| ch.is_ascii_digit()) {
        format!("{code:0>2}")
    } else {
        code.to_string()
    }
}

/// One reconciled location as it appears in the metadata bundle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationEntry {
    pub location: String,
    pub location_name: String,
}

impl LocationEntry {
    pub fn new(location: impl Into<String>, location_name: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            location_name: location_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> LocationReference {
        let mut names = BTreeMap::new();
        names.insert("01".to_string(), "Alabama".to_string());
        names.insert("US".to_string(), "United States".to_string());
        LocationReference::new(names)
    }

    #[test]
    fn numeric_codes_zero_padded() {
        let reference = reference();
        assert_eq!(reference.get("1"), Some("Alabama"));
        assert_eq!(reference.get("01"), Some("Alabama"));
        assert_eq!(reference.get("US"), Some("United States"));
        assert_eq!(reference.name_or_unknown("99"), UNKNOWN_LOCATION_NAME);
    }

    #[test]
    fn parses_flat_json_object() {
        let reference =
            LocationReference::from_json_str(r#"{"01": "Alabama", "02": "Alaska"}"#).unwrap();
        assert_eq!(reference.len(), 2);
        assert_eq!(reference.get("2"), Some("Alaska"));
    }
}
