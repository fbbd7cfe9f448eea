//! Load model
//!
//! Builds the standard [`StandardLoad`] shape for every [`LoadComponent`]
//! from the beam and the area loads in a [`LoadModelConfig`].
//!
//! ## Load shapes
//!
//! ```text
//! Dead / Roof live     Snow                         Wind pressure
//! ┌──────────────┐     ┐                            ┌──────┐
//! │              │     │ ╲                          │      └──────┐
//! 0              L     0   ╲______________ L        0     L/2     L
//!                          2L/3
//! ```
//!
//! Wind uplift is a constant acting against gravity (negative intensity).

use serde::{Deserialize, Serialize};

use crate::calculations::BeamProperties;
use crate::errors::{CalcError, CalcResult};
use crate::units::{Feet, Psf};

use super::load_types::LoadComponent;
use super::LoadFunction;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Snow load parameters
///
/// Full intensity at `x = 0` tapers linearly by `taper` (fraction of full)
/// until `breakpoint_ratio * L`, beyond which the reduced intensity applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    /// Intensity at the left end (psf)
    pub full_psf: f64,
    /// Intensity beyond the breakpoint (psf)
    pub reduced_psf: f64,
    /// Fraction of the full intensity lost over the tapered region
    pub taper: f64,
    /// Breakpoint as a fraction of the beam length
    pub breakpoint_ratio: f64,
}

impl Default for SnowConfig {
    fn default() -> Self {
        SnowConfig {
            full_psf: 40.0,
            reduced_psf: 10.0,
            taper: 0.75,
            breakpoint_ratio: 2.0 / 3.0,
        }
    }
}

/// Wind load parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Uplift magnitude (psf); applied with negative sign
    pub uplift_psf: f64,
    /// Pressure up to the step (psf)
    pub windward_psf: f64,
    /// Pressure past the step (psf)
    pub leeward_psf: f64,
    /// Step location as a fraction of the beam length
    pub step_ratio: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        WindConfig {
            uplift_psf: 30.0,
            windward_psf: 35.0,
            leeward_psf: 20.0,
            step_ratio: 0.5,
        }
    }
}

/// Area loads carried by the beam
///
/// # JSON Format
/// ```json
/// {
///   "tributary_width_ft": 12.0,
///   "dead_psf": 20.0,
///   "roof_live_psf": 15.0,
///   "snow": { "full_psf": 40.0, "reduced_psf": 10.0, "taper": 0.75, "breakpoint_ratio": 0.6667 },
///   "wind": { "uplift_psf": 30.0, "windward_psf": 35.0, "leeward_psf": 20.0, "step_ratio": 0.5 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadModelConfig {
    /// Width of floor/roof carried by the beam (ft)
    pub tributary_width_ft: f64,
    /// Applied (superimposed) dead load (psf)
    pub dead_psf: f64,
    /// Roof live load (psf)
    pub roof_live_psf: f64,
    /// Snow parameters
    pub snow: SnowConfig,
    /// Wind parameters
    pub wind: WindConfig,
}

impl Default for LoadModelConfig {
    fn default() -> Self {
        LoadModelConfig {
            tributary_width_ft: 12.0,
            dead_psf: 20.0,
            roof_live_psf: 15.0,
            snow: SnowConfig::default(),
            wind: WindConfig::default(),
        }
    }
}

impl LoadModelConfig {
    /// Validate the parameters
    pub fn validate(&self) -> CalcResult<()> {
        let finite = [
            ("tributary_width_ft", self.tributary_width_ft),
            ("dead_psf", self.dead_psf),
            ("roof_live_psf", self.roof_live_psf),
            ("snow.full_psf", self.snow.full_psf),
            ("snow.reduced_psf", self.snow.reduced_psf),
            ("snow.taper", self.snow.taper),
            ("wind.uplift_psf", self.wind.uplift_psf),
            ("wind.windward_psf", self.wind.windward_psf),
            ("wind.leeward_psf", self.wind.leeward_psf),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be a finite number"));
            }
        }

        if self.tributary_width_ft <= 0.0 {
            return Err(CalcError::invalid_input(
                "tributary_width_ft",
                self.tributary_width_ft.to_string(),
                "Tributary width must be positive",
            ));
        }

        let ratio = self.snow.breakpoint_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(CalcError::invalid_input(
                "snow.breakpoint_ratio",
                ratio.to_string(),
                "Breakpoint must lie in (0, 1]",
            ));
        }

        let ratio = self.wind.step_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(CalcError::invalid_input(
                "wind.step_ratio",
                ratio.to_string(),
                "Step must lie strictly inside the beam (0, 1)",
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LOAD SHAPES
// =============================================================================

/// A named load shape, in lb/in, positive downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardLoad {
    /// Same intensity everywhere
    Uniform { intensity: f64 },

    /// Linear taper from `full` at x = 0, losing `taper * full` by
    /// `breakpoint`, then constant `reduced`
    Tapered {
        full: f64,
        reduced: f64,
        taper: f64,
        breakpoint: f64,
    },

    /// `before` for x <= at, `after` beyond
    Step { before: f64, after: f64, at: f64 },
}

impl LoadFunction for StandardLoad {
    fn evaluate(&self, x: f64) -> f64 {
        match *self {
            StandardLoad::Uniform { intensity } => intensity,
            StandardLoad::Tapered {
                full,
                reduced,
                taper,
                breakpoint,
            } => {
                if x <= breakpoint {
                    full * (1.0 - taper * x / breakpoint)
                } else {
                    reduced
                }
            }
            StandardLoad::Step { before, after, at } => {
                if x <= at {
                    before
                } else {
                    after
                }
            }
        }
    }
}

// =============================================================================
// LOAD MODEL
// =============================================================================

/// Standard loads for one beam
///
/// # Example
/// ```
/// use beamcase_core::calculations::BeamProperties;
/// use beamcase_core::loads::{LoadComponent, LoadFunction, LoadModel, LoadModelConfig};
///
/// let model = LoadModel::new(&BeamProperties::default(), &LoadModelConfig::default()).unwrap();
/// let dead = model.load(LoadComponent::Dead);
///
/// // 8.15 in^2 * 0.284 lb/in^3 + 20 psf * 12 ft / 12
/// assert!((dead.evaluate(100.0) - 22.3146).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LoadModel {
    /// Beam length (in)
    length_in: f64,
    /// psf -> lb/in conversion factor
    conversion: f64,
    /// Self-weight (lb/in)
    self_weight: f64,
    config: LoadModelConfig,
}

impl LoadModel {
    /// Build the load model for a beam
    pub fn new(beam: &BeamProperties, config: &LoadModelConfig) -> CalcResult<Self> {
        beam.validate()?;
        config.validate()?;

        // Tributary area spread over the beam length, psf -> lb/in
        let tributary_area = config.tributary_width_ft * beam.length_in;
        let conversion = Psf(1.0).over_width(Feet(tributary_area / beam.length_in)).0;

        Ok(LoadModel {
            length_in: beam.length_in,
            conversion,
            self_weight: beam.self_weight_pli(),
            config: config.clone(),
        })
    }

    /// psf -> lb/in conversion factor
    pub fn conversion(&self) -> f64 {
        self.conversion
    }

    /// Beam length (in)
    pub fn length_in(&self) -> f64 {
        self.length_in
    }

    /// The load shape for a component
    pub fn load(&self, component: LoadComponent) -> StandardLoad {
        let c = self.conversion;
        let l = self.length_in;
        let snow = &self.config.snow;
        let wind = &self.config.wind;

        match component {
            LoadComponent::Dead => StandardLoad::Uniform {
                intensity: self.self_weight + c * self.config.dead_psf,
            },
            LoadComponent::RoofLive => StandardLoad::Uniform {
                intensity: c * self.config.roof_live_psf,
            },
            LoadComponent::Snow => StandardLoad::Tapered {
                full: c * snow.full_psf,
                reduced: c * snow.reduced_psf,
                taper: snow.taper,
                breakpoint: snow.breakpoint_ratio * l,
            },
            LoadComponent::WindUplift => StandardLoad::Uniform {
                intensity: -c * wind.uplift_psf,
            },
            LoadComponent::WindPressure => StandardLoad::Step {
                before: c * wind.windward_psf,
                after: c * wind.leeward_psf,
                at: wind.step_ratio * l,
            },
            LoadComponent::WindTotal => StandardLoad::Step {
                before: c * (wind.windward_psf - wind.uplift_psf),
                after: c * (wind.leeward_psf - wind.uplift_psf),
                at: wind.step_ratio * l,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const L: f64 = 264.0;

    fn model() -> LoadModel {
        LoadModel::new(&BeamProperties::default(), &LoadModelConfig::default()).unwrap()
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_conversion_factor() {
        // 12 ft tributary width -> 1 psf is 1 lb/in
        assert!(approx_eq(model().conversion(), 1.0));
    }

    #[test]
    fn test_dead_load_is_constant() {
        let dead = model().load(LoadComponent::Dead);
        let expected = 8.15 * 0.284 + 20.0;
        assert!(approx_eq(dead.evaluate(0.0), expected));
        assert!(approx_eq(dead.evaluate(L / 3.0), expected));
        assert!(approx_eq(dead.evaluate(L), expected));
    }

    #[test]
    fn test_roof_live() {
        assert!(approx_eq(model().load(LoadComponent::RoofLive).evaluate(50.0), 15.0));
    }

    #[test]
    fn test_snow_taper() {
        let snow = model().load(LoadComponent::Snow);
        assert!(approx_eq(snow.evaluate(0.0), 40.0));
        assert!(approx_eq(snow.evaluate(L * 2.0 / 3.0), 10.0));
        assert!(approx_eq(snow.evaluate(L), 10.0));
        // Halfway through the taper: 40 * (1 - 0.75 / 2)
        assert!(approx_eq(snow.evaluate(L / 3.0), 25.0));
    }

    #[test]
    fn test_wind_terms() {
        let m = model();
        let uplift = m.load(LoadComponent::WindUplift);
        let pressure = m.load(LoadComponent::WindPressure);
        let total = m.load(LoadComponent::WindTotal);

        assert!(approx_eq(uplift.evaluate(10.0), -30.0));
        assert!(approx_eq(pressure.evaluate(L / 2.0), 35.0));
        assert!(approx_eq(pressure.evaluate(L / 2.0 + 0.1), 20.0));
        assert!(approx_eq(pressure.evaluate(L), 20.0));
        assert!(approx_eq(total.evaluate(0.0), -30.0 + 35.0));
        for x in [0.0, 10.0, L / 2.0, L / 2.0 + 0.1, L] {
            assert!(approx_eq(total.evaluate(x), uplift.evaluate(x) + pressure.evaluate(x)));
        }
    }

    #[test]
    fn test_conversion_scales_area_loads_only() {
        let config = LoadModelConfig {
            tributary_width_ft: 6.0,
            ..Default::default()
        };
        let m = LoadModel::new(&BeamProperties::default(), &config).unwrap();
        let dead = m.load(LoadComponent::Dead).evaluate(0.0);
        assert!(approx_eq(dead, 8.15 * 0.284 + 10.0));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let snow = model().load(LoadComponent::Snow);
        let first: Vec<f64> = (0..=10).map(|i| snow.evaluate(i as f64 * L / 10.0)).collect();
        let second: Vec<f64> = (0..=10).rev().map(|i| snow.evaluate(i as f64 * L / 10.0)).collect();
        let second: Vec<f64> = second.into_iter().rev().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_ratios_rejected() {
        let mut config = LoadModelConfig::default();
        config.wind.step_ratio = 1.0;
        assert!(config.validate().is_err());

        let mut config = LoadModelConfig::default();
        config.snow.breakpoint_ratio = 0.0;
        assert!(config.validate().is_err());

        let config = LoadModelConfig {
            tributary_width_ft: -1.0,
            ..Default::default()
        };
        assert!(LoadModel::new(&BeamProperties::default(), &config).is_err());
    }
}
