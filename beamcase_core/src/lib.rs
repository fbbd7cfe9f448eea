//! # beamcase_core - Beam Load-Combination Engine
//!
//! `beamcase_core` evaluates a table of factored load combinations against a
//! single beam and produces per-scenario diagrams and a cross-scenario
//! summary. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Load functions, solver calls and analysis are pure
//! - **JSON-First**: Run files and results implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types tagged with the scenario name
//! - **Isolated Failures**: One failed scenario never stops the run
//!
//! ## Quick Start
//!
//! ```rust
//! use beamcase_core::calculations::{analyze_diagram, solve_scenario, CompatibilitySolver};
//! use beamcase_core::config::RunConfig;
//!
//! let config = RunConfig::default();
//! let scenarios = config.scenarios().unwrap();
//!
//! // C1.00 = 1.4D on a simple span
//! let c1 = &scenarios[0];
//! let solved = solve_scenario(&CompatibilitySolver, &config.beam, &c1.supports, &c1.load, 264).unwrap();
//! let analysis = analyze_diagram(&solved.samples).unwrap();
//!
//! assert!((solved.reactions.get(0).unwrap() - 4123.74).abs() < 0.01);
//! assert!((analysis.shear_zero.unwrap() - 132.0).abs() < 0.5);
//! ```
//!
//! ## Modules
//!
//! - [`loads`] - Load shapes, the load model and combinations
//! - [`calculations`] - Beam, supports, solver and diagram analysis
//! - [`report`] - Engineering notation, CSV tables and descriptions
//! - [`pipeline`] - Batch run with per-scenario failure isolation
//! - [`config`] - Run file structure
//! - [`file_io`] - Atomic writes, run files and output locking
//! - [`plot`] - gnuplot driver
//! - [`tolerance`] - Approximate comparisons
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod tolerance;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use config::{RunConfig, SCHEMA_VERSION};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_run_config, save_run_config, OutputLock};
pub use pipeline::{run, RunReport};
