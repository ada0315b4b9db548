//! Cargo subcommand generating test-runner sources from Gherkin feature
//! files.
//!
//! The selected package is read with `cargo metadata`; generator settings
//! come from its `[package.metadata.feature-runners]` table and the command
//! line. Each registered source root is printed to stdout.

mod cli;
mod config;
mod logging;
mod workspace;

use std::io::{self, Write};

use clap::Parser;
use eyre::{Context, Result};
use feature_runners::{GenerationError, generate_runners};
use tracing::info;

use crate::cli::{CargoCli, GenerateArgs};
use crate::config::CliConfig;
use crate::logging::init_logging;

fn main() {
    let CargoCli::FeatureRunners(args) = CargoCli::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&CliConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };
    init_logging(&config);

    if let Err(e) = run(&args) {
        tracing::error!(error = format!("{e:#}"), "runner generation failed");
        std::process::exit(1);
    }
}

fn build_config(args: &GenerateArgs) -> Result<CliConfig, GenerationError> {
    Ok(CliConfig::from_env()?.apply_overrides(args.log_level))
}

fn run(args: &GenerateArgs) -> Result<()> {
    let project =
        workspace::load_project(args.manifest_path.as_deref(), args.package.as_deref())?;
    let config = project.config.apply_overrides(args.overrides());
    let mut host = project.host;

    let report = generate_runners(config, &mut host)
        .wrap_err_with(|| format!("failed to generate runners for package `{}`", project.name))?;
    for source in &report.sources {
        info!(runner = %source.path, feature = %source.feature, "wrote runner");
    }

    let mut stdout = io::stdout().lock();
    for root in host.source_roots() {
        writeln!(stdout, "{root}").wrap_err("failed to write source root")?;
    }
    stdout.flush().wrap_err("failed to flush stdout")
}
