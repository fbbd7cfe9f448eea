//! # Plot Driver
//!
//! Renders one SVG per scenario by running gnuplot on the `<name>.csv` /
//! `<name>.txt` pairs of a run:
//!
//! ```text
//! gnuplot -e "plottext='<description>';basename='<name>';inputfile='<csv>'" <script>
//! ```
//!
//! gnuplot writes the SVG to stdout. A non-zero exit or empty output fails
//! that scenario only; the failure is reported, not retried.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, error, info};

use crate::errors::{CalcError, CalcResult};
use crate::file_io::write_atomic;

/// Default plotting program
pub const GNUPLOT: &str = "gnuplot";

/// One scenario to plot
#[derive(Debug, Clone, PartialEq)]
pub struct PlotJob {
    pub name: String,
    pub csv_path: PathBuf,
    /// Caption, read from `<name>.txt`
    pub description: String,
}

/// Outcome of a plot batch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotReport {
    /// SVG files written
    pub rendered: Vec<PathBuf>,
    /// `PlotFailed` errors, one per failed scenario
    pub failures: Vec<CalcError>,
}

impl PlotReport {
    /// True when every plot was rendered
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Escape a value for a single-quoted gnuplot string
pub fn escape_gnuplot(text: &str) -> String {
    text.replace('\'', "''")
}

/// The `-e` argument passed to gnuplot for a job
pub fn gnuplot_expression(job: &PlotJob) -> String {
    format!(
        "plottext='{}';basename='{}';inputfile='{}'",
        escape_gnuplot(&job.description),
        escape_gnuplot(&job.name),
        escape_gnuplot(&job.csv_path.to_string_lossy())
    )
}

/// Find every `<name>.csv` with a sibling `<name>.txt`, sorted by name
pub fn discover_jobs(csv_dir: &Path) -> CalcResult<Vec<PlotJob>> {
    let entries = fs::read_dir(csv_dir)
        .map_err(|e| CalcError::file_error("list", csv_dir.display().to_string(), e.to_string()))?;

    let mut jobs = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| CalcError::file_error("list", csv_dir.display().to_string(), e.to_string()))?
            .path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        let txt_path = path.with_extension("txt");
        if !txt_path.is_file() {
            debug!(csv = %path.display(), "no description, skipping");
            continue;
        }
        let description = fs::read_to_string(&txt_path)
            .map_err(|e| CalcError::file_error("read", txt_path.display().to_string(), e.to_string()))?;

        jobs.push(PlotJob {
            name,
            csv_path: path,
            description: description.trim().to_string(),
        });
    }

    jobs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(jobs)
}

/// Run the plotting program for one job and return its stdout
pub fn render(job: &PlotJob, script: &Path, program: &str) -> CalcResult<Vec<u8>> {
    let failed = |reason: String| CalcError::PlotFailed {
        scenario: job.name.clone(),
        reason,
    };

    let output = Command::new(program)
        .arg("-e")
        .arg(gnuplot_expression(job))
        .arg(script)
        .output()
        .map_err(|e| failed(format!("could not start {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(failed(format!("{} exited with {}: {}", program, output.status, stderr.trim())));
    }
    if output.stdout.is_empty() {
        return Err(failed(format!("{} produced no output", program)));
    }

    Ok(output.stdout)
}

/// Plot every job found in `csv_dir` into `out_dir/<name>.svg`
///
/// # Errors
///
/// Only listing `csv_dir` or creating `out_dir` fails the batch; each plot
/// failure is logged and collected in the [`PlotReport`].
pub fn plot_all(csv_dir: &Path, out_dir: &Path, script: &Path, program: &str) -> CalcResult<PlotReport> {
    let jobs = discover_jobs(csv_dir)?;
    fs::create_dir_all(out_dir)
        .map_err(|e| CalcError::file_error("create directory", out_dir.display().to_string(), e.to_string()))?;

    let mut report = PlotReport::default();
    for job in &jobs {
        let svg_path = out_dir.join(format!("{}.svg", job.name));
        let result = render(job, script, program).and_then(|svg| write_atomic(&svg_path, &svg));
        match result {
            Ok(()) => {
                info!(scenario = %job.name, path = %svg_path.display(), "rendered plot");
                report.rendered.push(svg_path);
            }
            Err(e) => {
                error!(scenario = %job.name, "{}", e);
                report.failures.push(e);
            }
        }
    }

    Ok(report)
}
