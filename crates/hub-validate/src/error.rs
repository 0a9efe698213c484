//! Error types for configuration loading and validation.

use std::path::PathBuf;

use hub_model::ValidationReport;
use thiserror::Error;

/// Errors that stop a configuration from being built.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Document root is not a non-empty list of single-key entries.
    #[error("malformed configuration document: {reason}")]
    MalformedDocument { reason: String },

    /// One or more validation rules reported an error.
    #[error(
        "configuration validation failed with {} error(s) and {} warning(s)",
        report.error_count(),
        report.warning_count()
    )]
    InvalidConfiguration { report: ValidationReport },

    /// Failed to read the configuration file.
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML.
    #[error("failed to parse YAML: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }

    /// Findings behind an `InvalidConfiguration` failure.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            ConfigError::InvalidConfiguration { report } => Some(report),
            _ => None,
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
