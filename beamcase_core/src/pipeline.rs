//! # Run Pipeline
//!
//! Solves every scenario, writes its artifacts and finalizes the summary.
//!
//! ## Failure Policy
//!
//! - A scenario failure (bad input, divergence, artifact write) is logged and
//!   recorded in the [`RunReport`]; the remaining scenarios still run.
//! - Artifacts of a scenario are written only after its computation fully
//!   succeeded, each through an atomic write.
//! - `summary.csv` is written once after all scenarios. Failing to write it
//!   fails the whole run.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beamcase_core::config::RunConfig;
//! use beamcase_core::pipeline::run;
//! use std::path::Path;
//!
//! let report = run(&RunConfig::default(), Path::new("csvs"), "engineer")?;
//! assert!(report.is_success());
//! # Ok::<(), beamcase_core::errors::CalcError>(())
//! ```

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::calculations::{analyze_diagram, solve_scenario, BeamProperties, BeamSolver, CompatibilitySolver, SolvedBeam};
use crate::config::RunConfig;
use crate::errors::{CalcError, CalcResult};
use crate::file_io::{write_atomic, write_atomic_group, OutputLock};
use crate::loads::Scenario;
use crate::report::{describe_scenario, diagram_csv, eng_notation, SummaryRow, SummaryTable};

/// File name of the cross-scenario summary
pub const SUMMARY_FILE_NAME: &str = "summary.csv";

/// How to process a batch of scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Grid intervals over the beam
    pub resolution: usize,
    /// Decimal places in engineering notation
    pub decimal_places: usize,
    /// Process scenarios in parallel
    pub parallel: bool,
}

/// The computed artifacts of one scenario, not yet written
#[derive(Debug, Clone)]
pub struct ScenarioOutput {
    pub name: String,
    pub solved: SolvedBeam,
    pub row: SummaryRow,
    /// `<name>.csv` contents
    pub csv: String,
    /// `<name>.txt` contents
    pub description: String,
}

impl ScenarioOutput {
    /// Write `<name>.csv` and `<name>.txt` into `dir`, both or neither
    pub fn write(&self, dir: &Path) -> CalcResult<()> {
        let csv_path = dir.join(format!("{}.csv", self.name));
        let txt_path = dir.join(format!("{}.txt", self.name));
        write_atomic_group(&[
            (csv_path.as_path(), self.csv.as_bytes()),
            (txt_path.as_path(), self.description.as_bytes()),
        ])
    }
}

/// A scenario that did not produce artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFailure {
    pub scenario: String,
    pub error: CalcError,
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Scenarios with artifacts, in declaration order
    pub succeeded: Vec<String>,
    /// Failed scenarios, in declaration order
    pub failures: Vec<ScenarioFailure>,
    /// Where the summary was written
    pub summary_path: PathBuf,
}

impl RunReport {
    /// True when every scenario succeeded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Solve and analyze one scenario, producing its artifacts in memory
pub fn process_scenario<S: BeamSolver + ?Sized>(
    solver: &S,
    beam: &BeamProperties,
    scenario: &Scenario,
    options: &RunOptions,
) -> CalcResult<ScenarioOutput> {
    let name = scenario.name.as_str();
    let solved = solve_scenario(solver, beam, &scenario.supports, &scenario.load, options.resolution)
        .map_err(|e| e.in_scenario(name))?;
    let analysis = analyze_diagram(&solved.samples).map_err(|e| e.in_scenario(name))?;

    let places = options.decimal_places;
    let csv = diagram_csv(&solved.samples).map_err(|e| e.in_scenario(name))?;
    let description = describe_scenario(name, &scenario.equation, &solved, &analysis, places);
    let row = SummaryRow::new(name, &solved, &analysis);

    Ok(ScenarioOutput {
        name: name.to_string(),
        solved,
        row,
        csv,
        description,
    })
}

fn process_and_write<S: BeamSolver + ?Sized>(
    solver: &S,
    beam: &BeamProperties,
    scenario: &Scenario,
    options: &RunOptions,
    dir: &Path,
) -> CalcResult<SummaryRow> {
    let output = process_scenario(solver, beam, scenario, options)?;
    output.write(dir).map_err(|e| e.in_scenario(&scenario.name))?;

    let places = options.decimal_places;
    let reactions: Vec<String> = output
        .solved
        .reactions
        .iter()
        .map(|r| eng_notation(*r, places))
        .collect();
    info!(
        scenario = %output.name,
        reactions = %reactions.join(", "),
        max_moment = %eng_notation(output.row.moment.max, places),
        "processed scenario"
    );

    Ok(output.row)
}

/// Run a batch of scenarios and write all artifacts into `dir`.
///
/// Results are collected in declaration order whether or not `parallel` is
/// set, so the summary is identical either way.
///
/// # Errors
///
/// Only a failure to write `summary.csv` is returned as an error; scenario
/// failures are listed in the [`RunReport`].
pub fn run_scenarios<S: BeamSolver + Sync + ?Sized>(
    solver: &S,
    beam: &BeamProperties,
    scenarios: &[Scenario],
    options: &RunOptions,
    dir: &Path,
) -> CalcResult<RunReport> {
    let process = |scenario: &Scenario| process_and_write(solver, beam, scenario, options, dir);
    let results: Vec<CalcResult<SummaryRow>> = if options.parallel {
        scenarios.par_iter().map(process).collect()
    } else {
        scenarios.iter().map(process).collect()
    };

    let mut rows = Vec::with_capacity(results.len());
    let mut succeeded = Vec::new();
    let mut failures = Vec::new();
    for (scenario, result) in scenarios.iter().zip(results) {
        match result {
            Ok(row) => {
                succeeded.push(scenario.name.clone());
                rows.push(row);
            }
            Err(e) => {
                error!(scenario = %scenario.name, code = e.error_code(), "{}", e);
                failures.push(ScenarioFailure {
                    scenario: scenario.name.clone(),
                    error: e,
                });
            }
        }
    }

    let summary_path = dir.join(SUMMARY_FILE_NAME);
    let table = SummaryTable::from_rows(rows);
    let csv = table.to_csv(options.decimal_places)?;
    write_atomic(&summary_path, csv.as_bytes())?;
    info!(
        path = %summary_path.display(),
        succeeded = succeeded.len(),
        failed = failures.len(),
        "wrote summary"
    );

    Ok(RunReport {
        succeeded,
        failures,
        summary_path,
    })
}

/// Run every combination of a run file into `dir`, holding the output lock.
///
/// Configuration errors that make every scenario meaningless (bad beam, bad
/// load model, bad resolution, invalid combination table) fail the run before
/// anything is written.
pub fn run(config: &RunConfig, dir: &Path, user_id: &str) -> CalcResult<RunReport> {
    let options = RunOptions {
        resolution: config.resolution()?,
        decimal_places: config.output.decimal_places,
        parallel: config.output.parallel,
    };
    let scenarios = config.scenarios()?;

    let _lock = OutputLock::acquire(dir, user_id)?;
    info!(
        scenarios = scenarios.len(),
        resolution = options.resolution,
        parallel = options.parallel,
        dir = %dir.display(),
        "starting run"
    );

    run_scenarios(&CompatibilitySolver, &config.beam, &scenarios, &options, dir)
}
