//! CLI argument definitions for `hubdash`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hubdash",
    version,
    about = "Forecast hub dashboard builder",
    long_about = "Validate a forecast hub dashboard configuration and reshape hub data.\n\n\
                  Reads target data and per-model quantile forecasts, pivots them to a\n\
                  wide layout and slices them by the configured forecast periods."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a configuration file and report every finding.
    Check(CheckArgs),

    /// Run the whole pipeline over a project directory.
    Build(BuildArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the YAML configuration file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Location reference JSON (code -> name); defaults to US state FIPS codes.
    #[arg(long = "locations", value_name = "PATH")]
    pub locations: Option<PathBuf>,
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Project directory holding config.yaml, target-data/ and model-output/.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Configuration file (default: <ROOT>/config.yaml).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read data from <ROOT>/test-data-input/ instead of <ROOT>.
    #[arg(long = "dev")]
    pub dev: bool,

    /// Location reference JSON (code -> name); defaults to US state FIPS codes.
    #[arg(long = "locations", value_name = "PATH")]
    pub locations: Option<PathBuf>,

    /// Print the metadata bundle as JSON to stdout.
    #[arg(long = "metadata-json")]
    pub metadata_json: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
