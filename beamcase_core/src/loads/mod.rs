//! Load functions and load combinations
//!
//! This module defines position-dependent loads and their composition into
//! factored combinations.
//!
//! # Overview
//!
//! - [`LoadFunction`] - the capability every load offers: `evaluate(x)`
//! - [`LoadComponent`] - the physical load types (D, Lr, S, W1, W2, W)
//! - [`StandardLoad`] / [`LoadModel`] - the shape of each component for a beam
//! - [`CompositeLoad`] - a pointwise weighted sum of standard loads
//! - [`CombinationSpec`] / [`Scenario`] - named combinations and their
//!   resolved, ready-to-solve form
//!
//! # Sign convention
//!
//! Intensities are in lb/in and positive with gravity (downward).
//!
//! # Example
//!
//! ```
//! use beamcase_core::calculations::BeamProperties;
//! use beamcase_core::loads::{CompositeLoad, LoadComponent, LoadFunction, LoadModel, LoadModelConfig};
//!
//! let model = LoadModel::new(&BeamProperties::default(), &LoadModelConfig::default()).unwrap();
//! let combo = CompositeLoad::from_terms(&model, &[
//!     (LoadComponent::Dead, 1.2),
//!     (LoadComponent::RoofLive, 1.6),
//! ]);
//!
//! let expected = 1.2 * 22.3146 + 1.6 * 15.0;
//! assert!((combo.evaluate(132.0) - expected).abs() < 1e-9);
//! ```

pub mod combinations;
pub mod load_types;
pub mod model;

pub use combinations::{
    default_combinations,
    generate_scenarios,
    CombinationSpec,
    CombinationTerm,
    Scenario,
};
pub use load_types::LoadComponent;
pub use model::{LoadModel, LoadModelConfig, SnowConfig, StandardLoad, WindConfig};

use serde::{Deserialize, Serialize};

/// A total mapping from position (in) to signed load intensity (lb/in).
///
/// Implementations must be pure: the same `x` always yields the same value,
/// regardless of call order or previous calls.
pub trait LoadFunction {
    /// Load intensity at position `x`
    fn evaluate(&self, x: f64) -> f64;
}

impl<T: LoadFunction + ?Sized> LoadFunction for &T {
    fn evaluate(&self, x: f64) -> f64 {
        (**self).evaluate(x)
    }
}

/// One weighted term of a combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadTerm {
    /// Which physical load this term stands for
    pub component: LoadComponent,
    /// Load factor
    pub factor: f64,
    /// Resolved load shape
    pub load: StandardLoad,
}

/// Pointwise weighted sum of standard loads
///
/// Terms are evaluated independently at every `x`; nothing is cached.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompositeLoad {
    pub terms: Vec<LoadTerm>,
}

impl CompositeLoad {
    /// Create an empty composite (zero load everywhere)
    pub fn new() -> Self {
        CompositeLoad { terms: Vec::new() }
    }

    /// Add a term (builder pattern)
    pub fn with_term(mut self, component: LoadComponent, factor: f64, load: StandardLoad) -> Self {
        self.terms.push(LoadTerm {
            component,
            factor,
            load,
        });
        self
    }

    /// Resolve `(component, factor)` pairs against a load model
    pub fn from_terms(model: &LoadModel, terms: &[(LoadComponent, f64)]) -> Self {
        terms
            .iter()
            .fold(CompositeLoad::new(), |acc, &(component, factor)| {
                acc.with_term(component, factor, model.load(component))
            })
    }

    /// Sum of factors applied to a component (repeated components add)
    pub fn factor_for(&self, component: LoadComponent) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.component == component)
            .map(|t| t.factor)
            .sum()
    }
}

impl LoadFunction for CompositeLoad {
    fn evaluate(&self, x: f64) -> f64 {
        self.terms
            .iter()
            .map(|term| term.factor * term.load.evaluate(x))
            .sum()
    }
}
