//! # Beamcase CLI
//!
//! Command-line front end for `beamcase_core`:
//!
//! - `beamcase run` - evaluate every combination and write the reports
//! - `beamcase init` - write the default run file
//! - `beamcase combos` - list the combination table
//! - `beamcase plot` - render the reports with gnuplot
//!
//! Logs go to stderr; `RUST_LOG` overrides the `-v` level.

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use beamcase_core::config::RunConfig;
use beamcase_core::file_io::{load_run_config, save_run_config};
use beamcase_core::pipeline;
use beamcase_core::plot;

use cli::{Cli, Commands};

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn user_id() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(path) => {
            let config = load_run_config(path).with_context(|| format!("loading run file {}", path.display()))?;
            info!(path = %path.display(), "loaded run file");
            Ok(config)
        }
        None => Ok(RunConfig::default()),
    }
}

fn run(config: Option<PathBuf>, out: PathBuf, parallel: bool) -> Result<()> {
    let mut config = load_config(config.as_deref())?;
    if parallel {
        config.output.parallel = true;
    }

    let report = pipeline::run(&config, &out, &user_id()).context("run failed")?;

    println!(
        "{} scenario(s) written to {}, summary: {}",
        report.succeeded.len(),
        out.display(),
        report.summary_path.display()
    );
    if !report.is_success() {
        for failure in &report.failures {
            eprintln!("  {} [{}]: {}", failure.scenario, failure.error.error_code(), failure.error);
        }
        bail!("{} scenario(s) failed", report.failures.len());
    }
    Ok(())
}

fn init(path: PathBuf, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    save_run_config(&RunConfig::default(), &path).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn combos(config: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config.combinations)?);
        return Ok(());
    }

    let default_supports = config.default_supports();
    for combo in &config.combinations {
        let supports = combo.supports.as_ref().unwrap_or(&default_supports);
        let pins: Vec<String> = supports.pins.iter().map(|p| p.to_string()).collect();
        println!(
            "{:<8} {:<28} pins [{}], left {}, right {}",
            combo.name,
            combo.display_equation(),
            pins.join(", "),
            supports.left,
            supports.right
        );
    }
    Ok(())
}

fn plot_reports(csv_dir: PathBuf, out: PathBuf, script: PathBuf, program: String) -> Result<()> {
    if !script.is_file() {
        warn!(script = %script.display(), "gnuplot script not found");
    }

    let report = plot::plot_all(&csv_dir, &out, &script, &program).context("plotting failed")?;
    println!("{} plot(s) written to {}", report.rendered.len(), out.display());
    if !report.is_success() {
        for failure in &report.failures {
            eprintln!("  {}", failure);
        }
        bail!("{} plot(s) failed", report.failures.len());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    let result = match cli.command {
        Commands::Run { config, out, parallel } => run(config, out, parallel),
        Commands::Init { path, force } => init(path, force),
        Commands::Combos { config, json } => combos(config, json),
        Commands::Plot {
            csv_dir,
            out,
            script,
            program,
        } => plot_reports(csv_dir, out, script, program),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
