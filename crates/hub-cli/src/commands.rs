use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use hub_cli::pipeline::{ProjectPaths, check, load_reference, run_build as run_pipeline, validation_context};
use hub_cli::types::{BuildResult, CheckResult};

use crate::cli::{BuildArgs, CheckArgs};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn run_check(args: &CheckArgs) -> Result<CheckResult> {
    let reference = load_reference(args.locations.as_deref())?;
    let data_root = args
        .config
        .parent()
        .map(std::path::Path::to_path_buf)
        .unwrap_or_default();
    let ctx = validation_context(today(), &reference, &data_root);
    check(&args.config, &ctx)
}

pub fn run_build(args: &BuildArgs) -> Result<BuildResult> {
    let paths = ProjectPaths::resolve(&args.root, args.config.as_deref(), args.dev);
    let reference = load_reference(args.locations.as_deref())?;
    run_pipeline(&paths, &reference, today())
        .with_context(|| format!("build dashboard data for {}", args.root.display()))
}

pub fn print_metadata_json(result: &BuildResult) -> Result<()> {
    let json = serde_json::to_string_pretty(&result.metadata).context("serialize metadata")?;
    println!("{json}");
    Ok(())
}
