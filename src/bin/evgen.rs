//! evgen CLI Binary
//!
//! Command-line interface for card generation and generator orchestration.

use anyhow::Context;
use clap::Parser;
use evgen::cli::{Cli, RunContext};
use evgen::config::ConfigLoader;
use evgen::logging::{init_logging, LoggingConfig};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("evgen starting");

    let context = match build_context(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing evgen: {:#}", e);
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", evgen::cli::map_error(&e));
            process::exit(1);
        }
    }
}

fn build_context(cli: &Cli) -> anyhow::Result<RunContext> {
    let context = RunContext::new(cli.workspace.clone(), cli.config.clone())
        .with_context(|| format!("loading configuration for {}", cli.workspace.display()))?;
    Ok(context.with_install_path(absolute_install_path(cli)?))
}

/// `--install-path` is given from the caller's point of view, so a relative
/// value is anchored to the current directory before the session takes it.
fn absolute_install_path(cli: &Cli) -> anyhow::Result<Option<PathBuf>> {
    match &cli.install_path {
        Some(path) if path.is_relative() => {
            let cwd = std::env::current_dir().context("resolving --install-path")?;
            Ok(Some(cwd.join(path)))
        }
        other => Ok(other.clone()),
    }
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.workspace)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }

    config
}
