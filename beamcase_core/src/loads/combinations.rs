//! LRFD-style load combinations
//!
//! A combination is a named list of factored load components. The default
//! table has 16 entries; a run file may replace it.
//!
//! ## Naming
//!
//! Names double as artifact file stems (`<name>.csv`, `<name>.txt`) and as the
//! first cell of the summary row, so they must be unique and may not contain
//! path separators or the CSV delimiter.
//!
//! ## Wind Sign Convention
//!
//! `W1` (uplift) is already negative in the load model, so `+0.8W1` reduces
//! the gravity load. Factors are applied as written.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::calculations::SupportConfig;
use crate::errors::{CalcError, CalcResult};

use super::load_types::LoadComponent;
use super::model::LoadModel;
use super::CompositeLoad;

/// One factored component of a combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinationTerm {
    pub component: LoadComponent,
    pub factor: f64,
}

/// A named load combination
///
/// # JSON Format
/// ```json
/// {
///   "name": "C3.12",
///   "equation": "1.2D + 1.6Lr + 0.8W1",
///   "terms": [
///     { "component": "Dead", "factor": 1.2 },
///     { "component": "RoofLive", "factor": 1.6 },
///     { "component": "WindUplift", "factor": 0.8 }
///   ]
/// }
/// ```
///
/// `equation` may be omitted and is then generated from the terms. `supports`
/// overrides the run's default support configuration for this combination.
///
/// # Example
/// ```
/// use beamcase_core::loads::{CombinationSpec, LoadComponent};
///
/// let combo = CombinationSpec::new("C6.10")
///     .with_factor(LoadComponent::Dead, 0.9)
///     .with_factor(LoadComponent::WindUplift, 1.6);
///
/// assert_eq!(combo.display_equation(), "0.9D + 1.6W1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationSpec {
    /// Combination identifier (e.g., "C1.00")
    pub name: String,

    /// Human-readable equation for display (e.g., "1.2D + 1.6Lr + 0.5S")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub equation: String,

    /// Factored components; repeated components add
    pub terms: Vec<CombinationTerm>,

    /// Support configuration for this combination only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports: Option<SupportConfig>,
}

impl CombinationSpec {
    /// Create an empty combination
    pub fn new(name: impl Into<String>) -> Self {
        CombinationSpec {
            name: name.into(),
            equation: String::new(),
            terms: Vec::new(),
            supports: None,
        }
    }

    /// Append a factored component (builder pattern)
    pub fn with_factor(mut self, component: LoadComponent, factor: f64) -> Self {
        self.terms.push(CombinationTerm { component, factor });
        self
    }

    /// Set an explicit display equation (builder pattern)
    pub fn with_equation(mut self, equation: impl Into<String>) -> Self {
        self.equation = equation.into();
        self
    }

    /// Use a non-default support configuration (builder pattern)
    pub fn with_supports(mut self, supports: SupportConfig) -> Self {
        self.supports = Some(supports);
        self
    }

    /// The declared equation, or one generated from the terms
    pub fn display_equation(&self) -> String {
        if !self.equation.trim().is_empty() {
            return self.equation.clone();
        }

        let mut out = String::new();
        for (i, term) in self.terms.iter().enumerate() {
            let magnitude = term.factor.abs();
            let coefficient = if magnitude == 1.0 {
                String::new()
            } else {
                magnitude.to_string()
            };
            match (i, term.factor < 0.0) {
                (0, false) => {}
                (0, true) => out.push('-'),
                (_, false) => out.push_str(" + "),
                (_, true) => out.push_str(" - "),
            }
            out.push_str(&coefficient);
            out.push_str(term.component.code());
        }
        out
    }

    /// `(component, factor)` pairs in declaration order
    pub fn factor_pairs(&self) -> Vec<(LoadComponent, f64)> {
        self.terms.iter().map(|t| (t.component, t.factor)).collect()
    }

    /// Validate the combination on its own (name and factors)
    pub fn validate(&self) -> CalcResult<()> {
        if self.name.trim().is_empty() {
            return Err(CalcError::invalid_input("name", "", "Combination name must not be empty"));
        }
        if let Some(bad) = self.name.chars().find(|c| matches!(c, '/' | '\\' | ',' | '\n' | '\r')) {
            return Err(CalcError::invalid_input(
                "name",
                self.name.clone(),
                format!("Combination name must not contain {:?}", bad),
            ));
        }
        if self.terms.is_empty() {
            return Err(CalcError::invalid_input(
                "terms",
                "[]",
                "A combination needs at least one term",
            ));
        }
        for (i, term) in self.terms.iter().enumerate() {
            if !term.factor.is_finite() {
                return Err(CalcError::invalid_input(
                    format!("terms[{}].factor", i),
                    term.factor.to_string(),
                    "Load factor must be finite",
                ));
            }
        }
        Ok(())
    }
}

/// A resolved combination, ready for the solver
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Combination name, also the artifact file stem
    pub name: String,
    /// Display equation
    pub equation: String,
    /// Composite load function
    pub load: CompositeLoad,
    /// Support configuration in effect
    pub supports: SupportConfig,
}

/// Resolve combinations into scenarios.
///
/// Every combination is validated before any scenario is returned: names must
/// be unique, terms finite, and the effective support configuration valid for
/// the beam length.
///
/// # Errors
///
/// `InvalidInput` tagged with the offending scenario name.
pub fn generate_scenarios(
    model: &LoadModel,
    combinations: &[CombinationSpec],
    default_supports: &SupportConfig,
) -> CalcResult<Vec<Scenario>> {
    let mut seen = HashSet::new();
    let mut scenarios = Vec::with_capacity(combinations.len());

    for combo in combinations {
        combo.validate().map_err(|e| e.in_scenario(&combo.name))?;
        if !seen.insert(combo.name.as_str()) {
            return Err(CalcError::invalid_input(
                "name",
                combo.name.clone(),
                "Combination names must be unique",
            )
            .in_scenario(&combo.name));
        }

        let supports = combo.supports.clone().unwrap_or_else(|| default_supports.clone());
        supports
            .validate(model.length_in())
            .map_err(|e| e.in_scenario(&combo.name))?;

        scenarios.push(Scenario {
            name: combo.name.clone(),
            equation: combo.display_equation(),
            load: CompositeLoad::from_terms(model, &combo.factor_pairs()),
            supports,
        });
    }

    Ok(scenarios)
}

/// The default 16-combination table
///
/// # Example
/// ```
/// use beamcase_core::loads::default_combinations;
///
/// let combos = default_combinations();
/// assert_eq!(combos.len(), 16);
/// assert_eq!(combos[0].name, "C1.00");
/// ```
pub fn default_combinations() -> Vec<CombinationSpec> {
    use LoadComponent::{Dead, RoofLive, Snow, WindPressure, WindUplift};

    vec![
        // 1. 1.4D
        CombinationSpec::new("C1.00")
            .with_factor(Dead, 1.4),

        // 2. 1.2D + 1.6Lr + 0.5S
        CombinationSpec::new("C2.10")
            .with_factor(Dead, 1.2)
            .with_factor(RoofLive, 1.6)
            .with_factor(Snow, 0.5),

        // 3. 1.2D + 1.6Lr + (Lr or 0.8W)
        CombinationSpec::new("C3.11")
            .with_factor(Dead, 1.2)
            .with_factor(RoofLive, 1.6)
            .with_factor(RoofLive, 1.0),

        CombinationSpec::new("C3.12")
            .with_factor(Dead, 1.2)
            .with_factor(RoofLive, 1.6)
            .with_factor(WindUplift, 0.8),

        CombinationSpec::new("C3.13")
            .with_factor(Dead, 1.2)
            .with_factor(RoofLive, 1.6)
            .with_factor(WindPressure, 0.8),

        // 3. 1.2D + 1.6S + (Lr or 0.8W)
        CombinationSpec::new("C3.21")
            .with_factor(Dead, 1.2)
            .with_factor(Snow, 1.6)
            .with_factor(RoofLive, 1.0),

        CombinationSpec::new("C3.22")
            .with_factor(Dead, 1.2)
            .with_factor(Snow, 1.6)
            .with_factor(WindUplift, 0.8),

        CombinationSpec::new("C3.23")
            .with_factor(Dead, 1.2)
            .with_factor(Snow, 1.6)
            .with_factor(WindPressure, 0.8),

        // 4. 1.2D + 1.6W + Lr + 0.5(Lr or S)
        CombinationSpec::new("C4.11")
            .with_factor(Dead, 1.2)
            .with_factor(WindUplift, 1.6)
            .with_factor(RoofLive, 1.0)
            .with_factor(RoofLive, 0.5),

        CombinationSpec::new("C4.12")
            .with_factor(Dead, 1.2)
            .with_factor(WindUplift, 1.6)
            .with_factor(RoofLive, 1.0)
            .with_factor(Snow, 0.5),

        CombinationSpec::new("C4.21")
            .with_factor(Dead, 1.2)
            .with_factor(WindPressure, 1.6)
            .with_factor(RoofLive, 1.0)
            .with_factor(RoofLive, 0.5),

        CombinationSpec::new("C4.22")
            .with_factor(Dead, 1.2)
            .with_factor(WindPressure, 1.6)
            .with_factor(RoofLive, 1.0)
            .with_factor(Snow, 0.5),

        // 5. 1.2D + Lr + 0.2S
        CombinationSpec::new("C5.00")
            .with_factor(Dead, 1.2)
            .with_factor(RoofLive, 1.0)
            .with_factor(Snow, 0.2),

        // 6. 0.9D + 1.6W
        CombinationSpec::new("C6.10")
            .with_factor(Dead, 0.9)
            .with_factor(WindUplift, 1.6),

        CombinationSpec::new("C6.20")
            .with_factor(Dead, 0.9)
            .with_factor(WindPressure, 1.6),

        // 7. 0.9D
        CombinationSpec::new("C7.00")
            .with_factor(Dead, 0.9),
    ]
}
