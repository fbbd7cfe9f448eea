//! # Tabular Reports
//!
//! Every table declares its columns up front in a [`TableSchema`]; rows are
//! checked against the schema before anything is serialized.
//!
//! ## Tables
//!
//! - Diagram table (`<scenario>.csv`): `x,v,m,y`, one row per sample, plain
//!   numbers
//! - Summary table (`summary.csv`): one row per scenario, 15 fixed columns
//!
//! CSV output uses `,` as delimiter, `\n` line endings and no quoting; a cell
//! containing the delimiter or a line break is rejected instead.

use tracing::warn;

use crate::calculations::{Channel, DiagramAnalysis, DiagramSample, ExtremaResult, SolvedBeam};
use crate::errors::{CalcError, CalcResult};
use crate::tolerance::{approx_eq, Tolerance};

use super::notation::eng_notation;

/// Placeholder for a value that does not exist (no crossing, no second pin)
pub const MISSING: &str = "-";

const DELIMITER: char = ',';

/// Declared column layout of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name, used in error messages
    pub name: &'static str,
    /// Column headers in order
    pub columns: &'static [&'static str],
}

impl TableSchema {
    /// Per-scenario diagram table
    pub const DIAGRAM: TableSchema = TableSchema {
        name: "diagram",
        columns: &DiagramSample::FIELDS,
    };

    /// Cross-scenario summary table
    pub const SUMMARY: TableSchema = TableSchema {
        name: "summary",
        columns: &[
            "File",
            "Ay",
            "By",
            "min(V)",
            "max(V)",
            "min(M)",
            "max(M)",
            "min(Y)",
            "max(Y)",
            "x(v=0)",
            "x(m=0)",
            "x(v=min(V))",
            "x(v=max(V))",
            "x(m=min(M))",
            "x(m=max(M))",
        ],
    };

    /// Header line (without line terminator)
    pub fn header(&self) -> String {
        self.columns.join(",")
    }

    /// Check a row against the schema
    pub fn validate_row<S: AsRef<str>>(&self, row: &[S]) -> CalcResult<()> {
        if row.len() != self.columns.len() {
            return Err(CalcError::invalid_input(
                format!("{} row", self.name),
                format!("{} cells", row.len()),
                format!("Expected {} cells ({})", self.columns.len(), self.header()),
            ));
        }

        for (column, cell) in self.columns.iter().zip(row) {
            let cell = cell.as_ref();
            if cell.contains(DELIMITER) || cell.contains('\n') || cell.contains('\r') {
                return Err(CalcError::invalid_input(
                    format!("{}.{}", self.name, column),
                    cell,
                    "Cell must not contain the delimiter or a line break",
                ));
            }
        }

        Ok(())
    }

    /// Serialize validated rows; output ends with a line terminator
    pub fn to_csv<S: AsRef<str>>(&self, rows: &[Vec<S>]) -> CalcResult<String> {
        let mut out = self.header();
        out.push('\n');
        for row in rows {
            self.validate_row(row)?;
            let line: Vec<&str> = row.iter().map(|c| c.as_ref()).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        Ok(out)
    }
}

// =============================================================================
// DIAGRAM TABLE
// =============================================================================

/// The `x,v,m,y` table for one scenario
///
/// Numbers use Rust's shortest round-trip formatting, never an exponent.
pub fn diagram_csv(samples: &[DiagramSample]) -> CalcResult<String> {
    let rows: Vec<Vec<String>> = samples
        .iter()
        .map(|s| s.values().iter().map(|v| v.to_string()).collect())
        .collect();
    TableSchema::DIAGRAM.to_csv(&rows)
}

// =============================================================================
// SUMMARY TABLE
// =============================================================================

/// One scenario's line in the summary table
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    /// Scenario name
    pub file: String,
    /// Reaction of the first pin
    pub ay: Option<f64>,
    /// Reaction of the second pin
    pub by: Option<f64>,
    pub shear: ExtremaResult,
    pub moment: ExtremaResult,
    pub deflection: ExtremaResult,
    /// Where shear changes sign
    pub shear_zero: Option<f64>,
    /// Where moment changes sign
    pub moment_zero: Option<f64>,
}

impl SummaryRow {
    /// Build a row from a solved scenario.
    ///
    /// Missing crossings and a missing second pin are kept as `None` and
    /// logged as warnings.
    pub fn new(scenario: &str, solved: &SolvedBeam, analysis: &DiagramAnalysis) -> Self {
        let crossing = |channel: Channel, result: &CalcResult<f64>| match result {
            Ok(x) => Some(*x),
            Err(e) => {
                warn!(scenario, channel = channel.name(), error = %e, "no zero crossing");
                None
            }
        };

        let by = solved.reactions.get(1);
        if by.is_none() {
            warn!(scenario, pins = solved.reactions.len(), "fewer than two pins, By not reported");
        }

        SummaryRow {
            file: scenario.to_string(),
            ay: solved.reactions.get(0),
            by,
            shear: analysis.shear,
            moment: analysis.moment,
            deflection: analysis.deflection,
            shear_zero: crossing(Channel::V, &analysis.shear_zero),
            moment_zero: crossing(Channel::M, &analysis.moment_zero),
        }
    }

    /// Cells in [`TableSchema::SUMMARY`] order
    pub fn cells(&self, places: usize) -> Vec<String> {
        let eng = |v: f64| eng_notation(v, places);
        let eng_opt = |v: Option<f64>| v.map_or_else(|| MISSING.to_string(), eng);
        let location = |x: f64| format!("{:.1}", x);
        // Roundoff-level deflection prints as an exact zero
        let deflection = |y: f64| eng(if approx_eq(y, 0.0, Tolerance::POSITION) { 0.0 } else { y });

        vec![
            self.file.clone(),
            eng_opt(self.ay),
            eng_opt(self.by),
            eng(self.shear.min),
            eng(self.shear.max),
            eng(self.moment.min),
            eng(self.moment.max),
            deflection(self.deflection.min),
            deflection(self.deflection.max),
            eng_opt(self.shear_zero),
            eng_opt(self.moment_zero),
            location(self.shear.argmin),
            location(self.shear.argmax),
            location(self.moment.argmin),
            location(self.moment.argmax),
        ]
    }
}

/// Rows for every scenario of a run, serialized once
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Create an empty table
    pub fn new() -> Self {
        SummaryTable { rows: Vec::new() }
    }

    /// Build from rows already in run order
    pub fn from_rows(rows: Vec<SummaryRow>) -> Self {
        SummaryTable { rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no scenario produced a row
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize the whole table
    pub fn to_csv(&self, places: usize) -> CalcResult<String> {
        let cells: Vec<Vec<String>> = self.rows.iter().map(|r| r.cells(places)).collect();
        TableSchema::SUMMARY.to_csv(&cells)
    }
}

impl FromIterator<SummaryRow> for SummaryTable {
    fn from_iter<I: IntoIterator<Item = SummaryRow>>(iter: I) -> Self {
        SummaryTable::from_rows(iter.into_iter().collect())
    }
}
