//! # Error Types
//!
//! Structured error types for beamcase_core. Every failure carries enough
//! context (scenario, channel, operation) to be reported without a backtrace.
//!
//! ## Taxonomy
//!
//! | Variant | Meaning | Scope |
//! |---------|---------|-------|
//! | `InvalidInput` | Bad geometry, supports, samples or configuration | scenario |
//! | `SolverDivergence` | The beam cannot be solved (singular / unstable) | scenario |
//! | `NoSignChange` | A requested zero crossing does not exist | channel |
//! | `FileError` | Artifact could not be written or read | artifact |
//!
//! ## Example
//!
//! ```rust
//! use beamcase_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_in: f64) -> CalcResult<()> {
//!     if length_in <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "length_in",
//!             length_in.to_string(),
//!             "Beam length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_length(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for beamcase_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for load-combination runs.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (configuration error)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The beam solver could not produce a stable solution
    #[error("Solver diverged: {reason}")]
    SolverDivergence { reason: String },

    /// A channel never changes sign, so no zero crossing exists
    #[error("No sign change in channel '{channel}': {reason}")]
    NoSignChange { channel: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Output directory is locked by another run
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch in a run file
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// The external plotting tool failed for one scenario
    #[error("Plot failed for '{scenario}': {reason}")]
    PlotFailed { scenario: String, reason: String },

    /// A scenario-scoped failure, tagged with the scenario name
    #[error("Scenario '{scenario}': {source}")]
    Scenario {
        scenario: String,
        source: Box<CalcError>,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a SolverDivergence error
    pub fn solver_divergence(reason: impl Into<String>) -> Self {
        CalcError::SolverDivergence {
            reason: reason.into(),
        }
    }

    /// Create a NoSignChange error
    pub fn no_sign_change(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::NoSignChange {
            channel: channel.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Tag this error with the scenario it belongs to.
    ///
    /// Already-tagged errors are returned unchanged.
    pub fn in_scenario(self, scenario: impl Into<String>) -> Self {
        match self {
            tagged @ CalcError::Scenario { .. } => tagged,
            other => CalcError::Scenario {
                scenario: scenario.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error with any scenario tag removed
    pub fn root(&self) -> &CalcError {
        match self {
            CalcError::Scenario { source, .. } => source.root(),
            other => other,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "CONFIGURATION_ERROR",
            CalcError::SolverDivergence { .. } => "SOLVER_DIVERGENCE",
            CalcError::NoSignChange { .. } => "NO_SIGN_CHANGE",
            CalcError::FileError { .. } => "IO_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::PlotFailed { .. } => "PLOT_FAILED",
            CalcError::Scenario { source, .. } => source.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("length_in", "-5.0", "Beam length must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::solver_divergence("singular").error_code(), "SOLVER_DIVERGENCE");
        assert_eq!(CalcError::no_sign_change("v", "all positive").error_code(), "NO_SIGN_CHANGE");
    }

    #[test]
    fn test_scenario_tag_keeps_root() {
        let error = CalcError::no_sign_change("m", "all positive").in_scenario("C1.00");
        assert_eq!(error.error_code(), "NO_SIGN_CHANGE");
        assert!(error.to_string().contains("C1.00"));
        assert!(error.to_string().contains("'m'"));

        // Tagging twice keeps the innermost scenario
        let twice = error.clone().in_scenario("other");
        assert_eq!(twice, error);
        assert!(matches!(twice.root(), CalcError::NoSignChange { .. }));
    }
}
