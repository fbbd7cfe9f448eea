//! # Beam Solver
//!
//! Computes reactions and the shear / moment / deflection grid for one beam,
//! one support configuration and one load function.
//!
//! ## Method
//!
//! The beam is treated as a free body carrying the distributed load plus one
//! unknown force per pin and a force and moment per clamped end. The load
//! alone is integrated along the grid with the trapezoid rule:
//!
//! ```text
//! Vw = -∫ w        Mw = ∫ Vw        θw = ∫ Mw / EI        yw = ∫ θw
//! ```
//!
//! Each unknown reaction contributes a closed-form response
//! (`(x-a)+`, `(x-a)+²/2EI`, `(x-a)+³/6EI`), and two integration constants
//! fix the rigid-body position. The unknowns follow from:
//!
//! - vertical equilibrium
//! - moment equilibrium about `x = L`
//! - `y(a) = 0` at every pin
//! - `y = 0` and `θ = 0` at every clamped end
//!
//! which gives a small dense system, one row per unknown. Statically
//! indeterminate configurations need nothing special.
//!
//! ## Sample convention
//!
//! Shear samples report the value just right of `x`, except the last sample
//! (`x = L`) which reports the value just left of the end. For a simple span
//! this makes `V(0) = Ay` and `V(L) = -By`.
//!
//! ## References
//!
//! - "Structural Analysis" by R.C. Hibbeler, Chapter 10 (force method)

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadFunction;
use crate::tolerance::{approx_eq, Tolerance};

use super::response::{AnchorReaction, DiagramSample, ReactionSet, SolvedBeam};
use super::supports::{Anchor, Side, SupportConfig};

/// Smallest accepted ratio of singular values of the equilibrated system
const MIN_CONDITION_RATIO: f64 = 1e-12;

/// A beam-solving engine
///
/// Implementations must return exactly `resolution + 1` samples with uniform
/// spacing from `x = 0` to `x = length_in`, and one reaction per pin in
/// insertion order. A configuration that cannot be solved must fail with
/// [`CalcError::SolverDivergence`] rather than return non-finite values.
pub trait BeamSolver {
    /// Solve the beam
    fn solve(
        &self,
        length_in: f64,
        ei: f64,
        supports: &SupportConfig,
        load: &dyn LoadFunction,
        resolution: usize,
    ) -> CalcResult<SolvedBeam>;
}

/// Force-method solver with trapezoid integration of the load
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilitySolver;

impl CompatibilitySolver {
    /// Create a solver
    pub fn new() -> Self {
        CompatibilitySolver
    }
}

/// The load-only response along the grid
struct LoadResponse {
    xs: Vec<f64>,
    shear: Vec<f64>,
    moment: Vec<f64>,
    slope: Vec<f64>,
    deflection: Vec<f64>,
}

impl LoadResponse {
    fn integrate(length: f64, ei: f64, load: &dyn LoadFunction, resolution: usize) -> CalcResult<Self> {
        let n = resolution;
        let xs: Vec<f64> = (0..=n)
            .map(|k| if k == n { length } else { length * k as f64 / n as f64 })
            .collect();

        let w: Vec<f64> = xs.iter().map(|&x| load.evaluate(x)).collect();
        if let Some((k, value)) = w.iter().enumerate().find(|(_, value)| !value.is_finite()) {
            return Err(CalcError::invalid_input(
                "load",
                value.to_string(),
                format!("Load function is not finite at x = {}", xs[k]),
            ));
        }

        let negated: Vec<f64> = w.iter().map(|value| -value).collect();
        let shear = cumulative_trapezoid(&xs, &negated);
        let moment = cumulative_trapezoid(&xs, &shear);
        let curvature: Vec<f64> = moment.iter().map(|m| m / ei).collect();
        let slope = cumulative_trapezoid(&xs, &curvature);
        let deflection = cumulative_trapezoid(&xs, &slope);

        Ok(LoadResponse {
            xs,
            shear,
            moment,
            slope,
            deflection,
        })
    }

    fn last(values: &[f64]) -> f64 {
        values.last().copied().unwrap_or(0.0)
    }

    /// Load-only deflection at an arbitrary position (linear interpolation)
    fn deflection_at(&self, x: f64) -> f64 {
        interpolate(&self.xs, &self.deflection, x)
    }
}

/// Running trapezoid integral, starting at zero
fn cumulative_trapezoid(xs: &[f64], values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut acc = 0.0;
    out.push(acc);
    for k in 1..values.len() {
        acc += 0.5 * (values[k - 1] + values[k]) * (xs[k] - xs[k - 1]);
        out.push(acc);
    }
    out
}

/// Linear interpolation on a uniform, ascending grid
fn interpolate(xs: &[f64], values: &[f64], x: f64) -> f64 {
    let n = xs.len() - 1;
    if n == 0 {
        return values[0];
    }
    let h = xs[n] / n as f64;
    let k = ((x / h).floor() as usize).min(n - 1);
    let t = ((x - xs[k]) / (xs[k + 1] - xs[k])).clamp(0.0, 1.0);
    values[k] + t * (values[k + 1] - values[k])
}

/// `(x - a)` when positive, else zero
fn ramp(x: f64, a: f64) -> f64 {
    (x - a).max(0.0)
}

/// Whether a concentrated force at `a` is included in the shear sample at `x`
fn acts_at(x: f64, a: f64, length: f64) -> bool {
    if approx_eq(x, a, Tolerance::POSITION) {
        !approx_eq(x, length, Tolerance::POSITION)
    } else {
        x > a
    }
}

/// Column layout of the unknown vector
struct Unknowns {
    pins: usize,
    fixed: Vec<Side>,
}

impl Unknowns {
    fn count(&self) -> usize {
        self.pins + 2 * self.fixed.len() + 2
    }

    fn pin(&self, i: usize) -> usize {
        i
    }

    fn anchor_force(&self, j: usize) -> usize {
        self.pins + 2 * j
    }

    fn anchor_moment(&self, j: usize) -> usize {
        self.pins + 2 * j + 1
    }

    fn offset(&self) -> usize {
        self.count() - 2
    }

    fn rotation(&self) -> usize {
        self.count() - 1
    }
}

impl BeamSolver for CompatibilitySolver {
    fn solve(
        &self,
        length_in: f64,
        ei: f64,
        supports: &SupportConfig,
        load: &dyn LoadFunction,
        resolution: usize,
    ) -> CalcResult<SolvedBeam> {
        let l = length_in;
        let response = LoadResponse::integrate(l, ei, load, resolution)?;
        let layout = Unknowns {
            pins: supports.pins.len(),
            fixed: supports.fixed_sides(),
        };
        let size = layout.count();

        let mut a = DMatrix::<f64>::zeros(size, size);
        let mut b = DVector::<f64>::zeros(size);

        // Deflection and slope contributions of every unknown at position x
        // (only unknowns acting inside the span; right-end forces act at L)
        let fill_deflection = |a: &mut DMatrix<f64>, row: usize, x: f64| {
            for (i, &pin) in supports.pins.iter().enumerate() {
                a[(row, layout.pin(i))] = ramp(x, pin).powi(3) / (6.0 * ei);
            }
            for (j, side) in layout.fixed.iter().enumerate() {
                if *side == Side::Left {
                    a[(row, layout.anchor_force(j))] = x.powi(3) / (6.0 * ei);
                    a[(row, layout.anchor_moment(j))] = x * x / (2.0 * ei);
                }
            }
            a[(row, layout.offset())] = 1.0;
            a[(row, layout.rotation())] = x;
        };
        let fill_slope = |a: &mut DMatrix<f64>, row: usize, x: f64| {
            for (i, &pin) in supports.pins.iter().enumerate() {
                a[(row, layout.pin(i))] = ramp(x, pin).powi(2) / (2.0 * ei);
            }
            for (j, side) in layout.fixed.iter().enumerate() {
                if *side == Side::Left {
                    a[(row, layout.anchor_force(j))] = x * x / (2.0 * ei);
                    a[(row, layout.anchor_moment(j))] = x / ei;
                }
            }
            a[(row, layout.rotation())] = 1.0;
        };

        // Row 0: vertical equilibrium
        for i in 0..layout.pins {
            a[(0, layout.pin(i))] = 1.0;
        }
        for j in 0..layout.fixed.len() {
            a[(0, layout.anchor_force(j))] = 1.0;
        }
        b[0] = -LoadResponse::last(&response.shear);

        // Row 1: moment equilibrium about the right end
        for (i, &pin) in supports.pins.iter().enumerate() {
            a[(1, layout.pin(i))] = l - pin;
        }
        for (j, side) in layout.fixed.iter().enumerate() {
            if *side == Side::Left {
                a[(1, layout.anchor_force(j))] = l;
            }
            a[(1, layout.anchor_moment(j))] = 1.0;
        }
        b[1] = -LoadResponse::last(&response.moment);

        // Compatibility rows
        let mut row = 2;
        for &pin in &supports.pins {
            fill_deflection(&mut a, row, pin);
            b[row] = -response.deflection_at(pin);
            row += 1;
        }
        for side in &layout.fixed {
            match side {
                Side::Left => {
                    fill_deflection(&mut a, row, 0.0);
                    b[row] = 0.0;
                    fill_slope(&mut a, row + 1, 0.0);
                    b[row + 1] = 0.0;
                }
                Side::Right => {
                    fill_deflection(&mut a, row, l);
                    b[row] = -LoadResponse::last(&response.deflection);
                    fill_slope(&mut a, row + 1, l);
                    b[row + 1] = -LoadResponse::last(&response.slope);
                }
            }
            row += 2;
        }

        // Equilibrate rows so the force, moment and deflection equations
        // share one scale
        for r in 0..size {
            let scale = a.row(r).iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
            if scale > 0.0 {
                for c in 0..size {
                    a[(r, c)] /= scale;
                }
                b[r] /= scale;
            }
        }

        let singular_values = a.singular_values();
        let largest = singular_values.max();
        let smallest = singular_values.min();
        let ratio = if largest > 0.0 { smallest / largest } else { 0.0 };
        debug!(unknowns = size, condition_ratio = ratio, "assembled compatibility system");
        if !(ratio >= MIN_CONDITION_RATIO) {
            return Err(CalcError::solver_divergence(format!(
                "support configuration is singular or unstable (condition ratio {:.3e}); \
                 check for coincident pins or a missing restraint",
                ratio
            )));
        }

        let solution = a
            .lu()
            .solve(&b)
            .ok_or_else(|| CalcError::solver_divergence("compatibility system could not be factored"))?;
        if solution.iter().any(|v| !v.is_finite()) {
            return Err(CalcError::solver_divergence("compatibility solution is not finite"));
        }

        let pin_forces: Vec<f64> = (0..layout.pins).map(|i| solution[layout.pin(i)]).collect();
        let offset = solution[layout.offset()];
        let rotation = solution[layout.rotation()];

        let mut left_force = 0.0;
        let mut left_moment = 0.0;
        let mut anchors = Vec::with_capacity(layout.fixed.len());
        for (j, side) in layout.fixed.iter().enumerate() {
            let force = solution[layout.anchor_force(j)];
            let jump = solution[layout.anchor_moment(j)];
            match side {
                Side::Left => {
                    left_force = force;
                    left_moment = jump;
                    anchors.push(AnchorReaction {
                        side: Side::Left,
                        force,
                        moment: jump,
                    });
                }
                Side::Right => anchors.push(AnchorReaction {
                    side: Side::Right,
                    force,
                    moment: -jump,
                }),
            }
        }

        let samples: Vec<DiagramSample> = response
            .xs
            .iter()
            .enumerate()
            .map(|(k, &x)| {
                let mut v = response.shear[k];
                let mut m = response.moment[k];
                let mut y = response.deflection[k] + offset + rotation * x;

                for (&pin, &force) in supports.pins.iter().zip(&pin_forces) {
                    if acts_at(x, pin, l) {
                        v += force;
                    }
                    m += force * ramp(x, pin);
                    y += force * ramp(x, pin).powi(3) / (6.0 * ei);
                }

                if supports.left == Anchor::Fixed {
                    v += left_force;
                    m += left_force * x + left_moment;
                    y += left_force * x.powi(3) / (6.0 * ei) + left_moment * x * x / (2.0 * ei);
                }

                DiagramSample::new(x, v, m, y)
            })
            .collect();

        if samples
            .iter()
            .any(|s| !(s.v.is_finite() && s.m.is_finite() && s.y.is_finite()))
        {
            return Err(CalcError::solver_divergence("response grid contains non-finite values"));
        }

        Ok(SolvedBeam {
            reactions: ReactionSet(pin_forces),
            anchors,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::StandardLoad;

    const L: f64 = 264.0;
    const EI: f64 = 29e6 * 123.10554703476;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if b.abs() < 1e-10 {
            a.abs() < tol
        } else {
            ((a - b) / b).abs() < tol
        }
    }

    fn uniform(w: f64) -> StandardLoad {
        StandardLoad::Uniform { intensity: w }
    }

    #[test]
    fn test_simple_span_uniform() {
        let w = 10.0;
        let solved = CompatibilitySolver
            .solve(L, EI, &SupportConfig::simple_span(L), &uniform(w), 2640)
            .unwrap();

        assert_eq!(solved.samples.len(), 2641);
        assert_eq!(solved.samples[0].x, 0.0);
        assert_eq!(solved.samples[2640].x, L);

        // R = wL/2
        assert!(approx_eq(solved.reactions.get(0).unwrap(), w * L / 2.0, 1e-9));
        assert!(approx_eq(solved.reactions.get(1).unwrap(), w * L / 2.0, 1e-9));

        // V(0) = Ay, V(L) = -By
        assert!(approx_eq(solved.samples[0].v, w * L / 2.0, 1e-9));
        assert!(approx_eq(solved.samples[2640].v, -w * L / 2.0, 1e-9));

        // M(L/2) = wL²/8, zero at both ends
        assert!(approx_eq(solved.samples[1320].m, w * L * L / 8.0, 1e-9));
        assert!(solved.samples[0].m.abs() < 1e-9);
        assert!(solved.samples[2640].m.abs() < 1e-6);

        // δ(L/2) = -5wL⁴/384EI (upward positive)
        let expected = -5.0 * w * L.powi(4) / (384.0 * EI);
        assert!(approx_eq(solved.samples[1320].y, expected, 1e-4));
        assert!(solved.samples[0].y.abs() < 1e-9);
        assert!(solved.samples[2640].y.abs() < 1e-9);
    }

    #[test]
    fn test_two_equal_spans() {
        // Continuous over a middle pin: ends 3wl/8, middle 10wl/8, l = L/2
        let w = 10.0;
        let supports = SupportConfig::simple_span(L).with_pin(L / 2.0);
        let solved = CompatibilitySolver
            .solve(L, EI, &supports, &uniform(w), 2640)
            .unwrap();

        let l = L / 2.0;
        assert!(approx_eq(solved.reactions.get(0).unwrap(), 3.0 * w * l / 8.0, 1e-4));
        assert!(approx_eq(solved.reactions.get(1).unwrap(), 3.0 * w * l / 8.0, 1e-4));
        assert!(approx_eq(solved.reactions.get(2).unwrap(), 10.0 * w * l / 8.0, 1e-4));

        // Hogging moment over the middle pin: -wl²/8
        assert!(approx_eq(solved.samples[1320].m, -w * l * l / 8.0, 1e-4));
        assert!(solved.samples[1320].y.abs() < 1e-9);
    }

    #[test]
    fn test_fixed_fixed_end_moments() {
        let w = 10.0;
        let solved = CompatibilitySolver
            .solve(L, EI, &SupportConfig::fixed_fixed(), &uniform(w), 2640)
            .unwrap();

        assert!(solved.reactions.is_empty());
        let left = solved.anchor(Side::Left).unwrap();
        let right = solved.anchor(Side::Right).unwrap();
        assert!(approx_eq(left.force, w * L / 2.0, 1e-6));
        assert!(approx_eq(right.force, w * L / 2.0, 1e-6));
        assert!(approx_eq(left.moment, -w * L * L / 12.0, 1e-4));
        assert!(approx_eq(right.moment, -w * L * L / 12.0, 1e-4));

        // Midspan moment wL²/24
        assert!(approx_eq(solved.samples[1320].m, w * L * L / 24.0, 1e-3));
        assert!(approx_eq(solved.samples[2640].m, right.moment, 1e-6));
    }

    #[test]
    fn test_cantilever() {
        let w = 10.0;
        let supports = SupportConfig::new().with_anchor(Side::Left, Anchor::Fixed);
        let solved = CompatibilitySolver
            .solve(L, EI, &supports, &uniform(w), 2640)
            .unwrap();

        let left = solved.anchor(Side::Left).unwrap();
        assert!(approx_eq(left.force, w * L, 1e-9));
        assert!(approx_eq(left.moment, -w * L * L / 2.0, 1e-9));

        // Tip deflection -wL⁴/8EI, free end carries no shear or moment
        let tip = solved.samples[2640];
        assert!(approx_eq(tip.y, -w * L.powi(4) / (8.0 * EI), 1e-4));
        assert!(tip.v.abs() < 1e-6);
        assert!(tip.m.abs() < 1e-3);
    }

    #[test]
    fn test_propped_cantilever() {
        // Fixed left, pin at right: R_right = 3wL/8, M_fixed = -wL²/8
        let w = 10.0;
        let supports = SupportConfig::new()
            .with_pin(L)
            .with_anchor(Side::Left, Anchor::Fixed);
        let solved = CompatibilitySolver
            .solve(L, EI, &supports, &uniform(w), 2640)
            .unwrap();

        assert!(approx_eq(solved.reactions.get(0).unwrap(), 3.0 * w * L / 8.0, 1e-4));
        let left = solved.anchor(Side::Left).unwrap();
        assert!(approx_eq(left.force, 5.0 * w * L / 8.0, 1e-4));
        assert!(approx_eq(left.moment, -w * L * L / 8.0, 1e-4));
    }

    #[test]
    fn test_differential_relations() {
        // dV/dx = -w and dM/dx = V hold to discretization error
        let load = StandardLoad::Tapered {
            full: 40.0,
            reduced: 10.0,
            taper: 0.75,
            breakpoint: L * 2.0 / 3.0,
        };
        let solved = CompatibilitySolver
            .solve(L, EI, &SupportConfig::simple_span(L), &load, 2640)
            .unwrap();

        let s = &solved.samples;
        for k in 2..s.len() - 2 {
            let h = s[k + 1].x - s[k].x;
            let dv = (s[k + 1].v - s[k - 1].v) / (2.0 * h);
            let dm = (s[k + 1].m - s[k - 1].m) / (2.0 * h);
            assert!((dv + load.evaluate(s[k].x)).abs() < 0.2, "dV/dx at x = {}", s[k].x);
            assert!((dm - s[k].v).abs() < 1e-6 * s[0].v.abs().max(1.0));
        }
    }

    #[test]
    fn test_coincident_pins_diverge() {
        let supports = SupportConfig::new().with_pin(0.0).with_pin(0.0);
        let err = CompatibilitySolver
            .solve(L, EI, &supports, &uniform(10.0), 264)
            .unwrap_err();
        assert_eq!(err.error_code(), "SOLVER_DIVERGENCE");
    }

    #[test]
    fn test_non_finite_load_rejected() {
        let load = StandardLoad::Uniform { intensity: f64::NAN };
        let err = CompatibilitySolver
            .solve(L, EI, &SupportConfig::simple_span(L), &load, 264)
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_interpolate() {
        let xs = [0.0, 1.0, 2.0];
        let values = [0.0, 10.0, 30.0];
        assert_eq!(interpolate(&xs, &values, 0.5), 5.0);
        assert_eq!(interpolate(&xs, &values, 2.0), 30.0);
        assert_eq!(interpolate(&xs, &values, 1.5), 20.0);
    }

    #[test]
    fn test_cumulative_trapezoid_exact_for_linear() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let values = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(cumulative_trapezoid(&xs, &values), vec![0.0, 0.5, 2.0, 4.5]);
    }
}
