//! Configuration validation for the forecast hub dashboard.
//!
//! A YAML document is normalised into nested entries, read into a
//! [`draft::ConfigDraft`], checked by the registered rules in
//! [`checks::CHECKS`], and finally turned into a
//! [`hub_model::DashboardConfig`].

mod build;
pub mod checks;
mod context;
pub mod document;
pub mod draft;
mod error;

pub use build::{build_config, load_config, log_findings, parse_config_str};
pub use context::ValidationContext;
pub use error::{ConfigError, Result};
