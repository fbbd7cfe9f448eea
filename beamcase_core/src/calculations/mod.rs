//! # Structural Calculations
//!
//! Beam analysis for a single prismatic beam. Each scenario goes through the
//! same path:
//!
//! - [`BeamProperties`] + [`SupportConfig`] + a load function
//! - [`solve_scenario`] - validate, solve, check equilibrium
//! - [`diagram::analyze_diagram`] - extrema and zero crossings
//!
//! ## Available Calculations
//!
//! - [`beam`] - Beam geometry and material
//! - [`supports`] - Pins and end anchors
//! - [`solver`] - The [`BeamSolver`] trait and the compatibility-method solver
//! - [`diagram`] - Post-processing of the response grid

pub mod beam;
pub mod diagram;
pub mod response;
pub mod solver;
pub mod supports;

// Re-export commonly used types
pub use beam::BeamProperties;
pub use diagram::{analyze_diagram, find_extrema, find_zero_crossing, DiagramAnalysis, ExtremaResult};
pub use response::{AnchorReaction, Channel, DiagramSample, ReactionSet, SolvedBeam};
pub use solver::{BeamSolver, CompatibilitySolver};
pub use supports::{Anchor, Side, SupportConfig};

use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadFunction;
use crate::tolerance::{approx_eq, Tolerance};

/// Validate the inputs, run the solver and verify global equilibrium.
///
/// # Errors
///
/// - `InvalidInput` for a bad beam, a zero resolution or invalid supports
/// - `SolverDivergence` when the solver fails or its result is out of
///   equilibrium beyond [`Tolerance::EQUILIBRIUM`]
pub fn solve_scenario<S: BeamSolver + ?Sized>(
    solver: &S,
    beam: &BeamProperties,
    supports: &SupportConfig,
    load: &dyn LoadFunction,
    resolution: usize,
) -> CalcResult<SolvedBeam> {
    beam.validate()?;
    if resolution == 0 {
        return Err(CalcError::invalid_input(
            "resolution",
            "0",
            "At least one interval is required",
        ));
    }
    supports.validate(beam.length_in)?;

    let solved = solver.solve(beam.length_in, beam.ei(), supports, load, resolution)?;
    check_grid(&solved, beam.length_in, resolution)?;
    check_equilibrium(&solved, load)?;

    Ok(solved)
}

fn check_grid(solved: &SolvedBeam, length_in: f64, resolution: usize) -> CalcResult<()> {
    if solved.samples.len() != resolution + 1 {
        return Err(CalcError::solver_divergence(format!(
            "expected {} samples, solver returned {}",
            resolution + 1,
            solved.samples.len()
        )));
    }
    if solved.samples.first().map(|s| s.x) != Some(0.0) || solved.samples.last().map(|s| s.x) != Some(length_in) {
        return Err(CalcError::solver_divergence("response grid does not span [0, L]"));
    }
    // Uniform spacing L / resolution, which also makes x strictly increasing
    for (k, sample) in solved.samples.iter().enumerate() {
        let expected = length_in * k as f64 / resolution as f64;
        if !approx_eq(sample.x, expected, Tolerance::POSITION) {
            return Err(CalcError::solver_divergence(format!(
                "response grid is not uniform: sample {} at x = {}, expected {}",
                k, sample.x, expected
            )));
        }
    }
    Ok(())
}

/// Applied load integrated over the grid (trapezoid rule)
fn total_load(solved: &SolvedBeam, load: &dyn LoadFunction) -> f64 {
    solved
        .samples
        .windows(2)
        .map(|pair| 0.5 * (load.evaluate(pair[0].x) + load.evaluate(pair[1].x)) * (pair[1].x - pair[0].x))
        .sum()
}

fn check_equilibrium(solved: &SolvedBeam, load: &dyn LoadFunction) -> CalcResult<()> {
    let tolerance = Tolerance::EQUILIBRIUM;

    let applied = total_load(solved, load);
    let supported = solved.total_support_force();
    let residual = supported - applied;
    debug!(applied, supported, residual, "force equilibrium");
    if !(residual.abs() <= tolerance.allowance(applied, supported)) {
        return Err(CalcError::solver_divergence(format!(
            "force equilibrium violated: reactions {} vs applied load {}",
            supported, applied
        )));
    }

    // The moment at the right end must match its boundary condition
    let end_moment = solved.anchor(Side::Right).map_or(0.0, |a| a.moment);
    let last_moment = solved.samples.last().map_or(0.0, |s| s.m);
    let scale = solved.samples.iter().fold(0.0f64, |acc, s| acc.max(s.m.abs()));
    let residual = last_moment - end_moment;
    if !(residual.abs() <= tolerance.allowance(scale, end_moment)) {
        return Err(CalcError::solver_divergence(format!(
            "moment equilibrium violated: M(L) = {} vs end condition {}",
            last_moment, end_moment
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::StandardLoad;

    /// A solver that ignores the load and returns fixed reactions
    struct Unbalanced;

    impl BeamSolver for Unbalanced {
        fn solve(
            &self,
            length_in: f64,
            _ei: f64,
            supports: &SupportConfig,
            _load: &dyn LoadFunction,
            resolution: usize,
        ) -> CalcResult<SolvedBeam> {
            let samples = (0..=resolution)
                .map(|k| {
                    let x = if k == resolution { length_in } else { length_in * k as f64 / resolution as f64 };
                    DiagramSample::new(x, 0.0, 0.0, 0.0)
                })
                .collect();
            Ok(SolvedBeam {
                reactions: ReactionSet(vec![1.0; supports.pins.len()]),
                anchors: Vec::new(),
                samples,
            })
        }
    }

    /// A correct solve with one sample nudged off the uniform grid
    struct Skewed;

    impl BeamSolver for Skewed {
        fn solve(
            &self,
            length_in: f64,
            ei: f64,
            supports: &SupportConfig,
            load: &dyn LoadFunction,
            resolution: usize,
        ) -> CalcResult<SolvedBeam> {
            let mut solved = CompatibilitySolver.solve(length_in, ei, supports, load, resolution)?;
            solved.samples[1].x *= 1.5;
            Ok(solved)
        }
    }

    #[test]
    fn test_reference_scenario() {
        // 1.4 * D_total on two end pins
        let beam = BeamProperties::default();
        let w = 1.4 * (8.15 * 0.284 + 20.0);
        let load = StandardLoad::Uniform { intensity: w };
        let solved = solve_scenario(
            &CompatibilitySolver,
            &beam,
            &SupportConfig::simple_span(beam.length_in),
            &load,
            2640,
        )
        .unwrap();

        let ay = solved.reactions.get(0).unwrap();
        let by = solved.reactions.get(1).unwrap();
        // 1.4 * 22.3146 * 264 / 2
        assert!((ay - w * beam.length_in / 2.0).abs() < 1e-6);
        assert!((ay - 4123.74).abs() < 0.01);
        assert!((ay - by).abs() < 1e-6);

        let first = solved.samples[0];
        let last = solved.samples[solved.samples.len() - 1];
        assert!((first.v + last.v).abs() < 1e-6);
        assert!(first.m.abs() < 1e-9);
        assert!(last.m.abs() < 1e-6);
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let beam = BeamProperties::default();
        let err = solve_scenario(
            &CompatibilitySolver,
            &beam,
            &SupportConfig::default(),
            &StandardLoad::Uniform { intensity: 1.0 },
            0,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_single_pin_rejected() {
        let beam = BeamProperties::default();
        let err = solve_scenario(
            &CompatibilitySolver,
            &beam,
            &SupportConfig::new().with_pin(132.0),
            &StandardLoad::Uniform { intensity: 1.0 },
            264,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_equilibrium_violation_detected() {
        let beam = BeamProperties::default();
        let err = solve_scenario(
            &Unbalanced,
            &beam,
            &SupportConfig::default(),
            &StandardLoad::Uniform { intensity: 10.0 },
            264,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "SOLVER_DIVERGENCE");
        assert!(err.to_string().contains("force equilibrium"));
    }

    #[test]
    fn test_non_uniform_grid_detected() {
        let beam = BeamProperties::default();
        let err = solve_scenario(
            &Skewed,
            &beam,
            &SupportConfig::default(),
            &StandardLoad::Uniform { intensity: 10.0 },
            264,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "SOLVER_DIVERGENCE");
        assert!(err.to_string().contains("not uniform"));
    }

    #[test]
    fn test_dyn_solver() {
        let solver: &dyn BeamSolver = &CompatibilitySolver;
        let beam = BeamProperties::default();
        let solved = solve_scenario(
            solver,
            &beam,
            &SupportConfig::fixed_fixed(),
            &StandardLoad::Uniform { intensity: 10.0 },
            264,
        )
        .unwrap();
        assert_eq!(solved.samples.len(), 265);
        assert_eq!(solved.anchors.len(), 2);
    }
}
