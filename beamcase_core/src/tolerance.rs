//! # Numerical Tolerances
//!
//! Explicit approximate-equality checks. Comparisons between computed values
//! never round first; they go through [`approx_eq`] with a named [`Tolerance`].
//!
//! A pair `(a, b)` is considered equal when
//! `|a - b| <= absolute + relative * max(|a|, |b|)`.

use serde::{Deserialize, Serialize};

/// Absolute + relative tolerance pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Fixed slack, in the unit of the compared quantity
    pub absolute: f64,
    /// Slack proportional to the larger magnitude
    pub relative: f64,
}

impl Tolerance {
    /// Equilibrium residual allowed between applied load and reactions (lb)
    pub const EQUILIBRIUM: Tolerance = Tolerance {
        absolute: 1e-6,
        relative: 1e-6,
    };

    /// Positions that should coincide with a grid point (in)
    pub const POSITION: Tolerance = Tolerance {
        absolute: 1e-9,
        relative: 1e-12,
    };

    /// Create a tolerance
    pub const fn new(absolute: f64, relative: f64) -> Self {
        Tolerance { absolute, relative }
    }

    /// Allowed difference when comparing `a` and `b`
    pub fn allowance(&self, a: f64, b: f64) -> f64 {
        self.absolute + self.relative * a.abs().max(b.abs())
    }
}

/// Approximate equality under the given tolerance
///
/// ```rust
/// use beamcase_core::tolerance::{approx_eq, Tolerance};
///
/// assert!(approx_eq(4122.7, 4122.70000001, Tolerance::EQUILIBRIUM));
/// assert!(!approx_eq(1.0, 1.1, Tolerance::EQUILIBRIUM));
/// ```
pub fn approx_eq(a: f64, b: f64, tolerance: Tolerance) -> bool {
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= tolerance.allowance(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_part_scales() {
        let tol = Tolerance::new(0.0, 1e-3);
        assert!(approx_eq(1000.0, 1000.9, tol));
        assert!(!approx_eq(1.0, 1.01, tol));
    }

    #[test]
    fn test_non_finite_never_equal() {
        assert!(!approx_eq(f64::NAN, f64::NAN, Tolerance::EQUILIBRIUM));
        assert!(!approx_eq(f64::INFINITY, f64::INFINITY, Tolerance::EQUILIBRIUM));
    }
}
