//! Normalisation of the raw YAML document into one nested mapping.
//!
//! Configuration files are written as lists of single-key maps at every
//! level (`- time_unit: 7`, `- display_string: "..."`). Those lists collapse
//! into ordered [`Entries`] so the draft parser can use plain key lookups.
//! Entry order and repeated keys are preserved.

use serde_yaml::Value;

use crate::error::{ConfigError, Result};

/// A normalised document node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
    List(Vec<Node>),
    Map(Entries),
}

/// Ordered key/value pairs; the first occurrence of a key wins on lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entries(Vec<(String, Node)>);

impl Entries {
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    /// Like [`Entries::get`] but treats an explicit `null` as absent.
    pub fn get_present(&self, key: &str) -> Option<&Node> {
        self.get(key).filter(|node| !matches!(node, Node::Null))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.0.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Node)> for Entries {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Node {
    /// Scalar rendered as trimmed text; `None` for null, empty or nested nodes.
    pub fn scalar_text(&self) -> Option<String> {
        let text = match self {
            Node::String(value) => value.trim().to_string(),
            Node::Number(value) => value.to_string(),
            Node::Bool(value) => value.to_string(),
            Node::Null | Node::List(_) | Node::Map(_) => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// YAML integers only; floats and numeric strings are rejected.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Number(value) => value.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(value) => Some(*value),
            Node::String(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_entries(&self) -> Option<&Entries> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Short rendering used in finding messages.
    pub fn describe(&self) -> String {
        match self {
            Node::Null => "null".to_string(),
            Node::List(items) => format!("a list of {} item(s)", items.len()),
            Node::Map(entries) => format!("a mapping of {} key(s)", entries.len()),
            other => other.scalar_text().unwrap_or_default(),
        }
    }
}

/// Collapse a parsed YAML document into root [`Entries`].
///
/// The root must be a non-empty sequence whose items each hold exactly one
/// key; anything else is a [`ConfigError::MalformedDocument`].
pub fn normalize_document(document: &Value) -> Result<Entries> {
    let items = match document {
        Value::Null => return Err(ConfigError::malformed("document is empty")),
        Value::Sequence(items) if items.is_empty() => {
            return Err(ConfigError::malformed("document is empty"));
        }
        Value::Sequence(items) => items,
        Value::Tagged(tagged) => return normalize_document(&tagged.value),
        _ => {
            return Err(ConfigError::malformed(
                "root must be a list of single-key entries",
            ));
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let mapping = match item {
            Value::Mapping(mapping) if mapping.len() == 1 => mapping,
            _ => {
                return Err(ConfigError::malformed(format!(
                    "root entry {} must be a single-key mapping",
                    idx + 1
                )));
            }
        };
        for (key, value) in mapping {
            entries.push((key_text(key)?, normalize(value)?));
        }
    }
    Ok(Entries(entries))
}

fn normalize(value: &Value) -> Result<Node> {
    Ok(match value {
        Value::Null => Node::Null,
        Value::Bool(flag) => Node::Bool(*flag),
        Value::Number(number) => Node::Number(number.clone()),
        Value::String(text) => Node::String(text.clone()),
        Value::Sequence(items) if is_singleton_map_list(items) => {
            let mut entries = Vec::with_capacity(items.len());
            for item in items {
                if let Value::Mapping(mapping) = item {
                    for (key, value) in mapping {
                        entries.push((key_text(key)?, normalize(value)?));
                    }
                }
            }
            Node::Map(Entries(entries))
        }
        Value::Sequence(items) => Node::List(items.iter().map(normalize).collect::<Result<_>>()?),
        Value::Mapping(mapping) => {
            let mut entries = Vec::with_capacity(mapping.len());
            for (key, value) in mapping {
                entries.push((key_text(key)?, normalize(value)?));
            }
            Node::Map(Entries(entries))
        }
        Value::Tagged(tagged) => normalize(&tagged.value)?,
    })
}

fn is_singleton_map_list(items: &[Value]) -> bool {
    !items.is_empty()
        && items
            .iter()
            .all(|item| matches!(item, Value::Mapping(mapping) if mapping.len() == 1))
}

fn key_text(key: &Value) -> Result<String> {
    match key {
        Value::String(text) => Ok(text.trim().to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(ConfigError::malformed(format!(
            "mapping keys must be scalars, found {other:?}"
        ))),
    }
}
