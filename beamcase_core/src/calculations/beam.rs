//! Beam geometry and material
//!
//! A single prismatic beam: length, section properties and elastic modulus.
//! All values are US customary, lengths in inches.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{Feet, Inches};

/// Geometry and material of the beam under study
///
/// # JSON Format
/// ```json
/// {
///   "length_in": 264.0,
///   "moment_of_inertia_in4": 123.10554703476,
///   "elastic_modulus_psi": 29000000.0,
///   "area_in2": 8.15,
///   "specific_weight_pci": 0.284
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamProperties {
    /// Beam length (in)
    pub length_in: f64,
    /// Strong-axis moment of inertia (in^4)
    pub moment_of_inertia_in4: f64,
    /// Modulus of elasticity (psi)
    pub elastic_modulus_psi: f64,
    /// Cross-sectional area (in^2)
    pub area_in2: f64,
    /// Specific weight of the material (lb/in^3)
    pub specific_weight_pci: f64,
}

impl Default for BeamProperties {
    /// 22 ft steel beam
    fn default() -> Self {
        BeamProperties {
            length_in: Inches::from(Feet(22.0)).0,
            moment_of_inertia_in4: 123.10554703476,
            elastic_modulus_psi: 29e6,
            area_in2: 8.15,
            specific_weight_pci: 0.284,
        }
    }
}

impl BeamProperties {
    /// Flexural stiffness EI (lb-in^2)
    pub fn ei(&self) -> f64 {
        self.elastic_modulus_psi * self.moment_of_inertia_in4
    }

    /// Self-weight as a line load (lb/in)
    pub fn self_weight_pli(&self) -> f64 {
        self.area_in2 * self.specific_weight_pci
    }

    /// Validate the beam properties
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("length_in", self.length_in),
            ("moment_of_inertia_in4", self.moment_of_inertia_in4),
            ("elastic_modulus_psi", self.elastic_modulus_psi),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a positive finite number",
                ));
            }
        }

        let non_negative = [
            ("area_in2", self.area_in2),
            ("specific_weight_pci", self.specific_weight_pci),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a non-negative finite number",
                ));
            }
        }

        Ok(())
    }
}
