//! # Support Configuration
//!
//! Pins along the beam plus the boundary condition at each end.
//!
//! ## Notation
//!
//! - Pins are indexed 0..N-1 in insertion order, which is also the order of
//!   the reported reactions (`Ay`, `By`, `Cy`, ...). Insertion order need not
//!   match position order.
//! - An end anchor is either `Free` or `Fixed` (clamped: no deflection and no
//!   rotation).
//!
//! ## Example
//!
//! ```rust
//! use beamcase_core::calculations::supports::{Anchor, SupportConfig};
//!
//! // Simple span with an extra brace pin at midspan
//! let supports = SupportConfig::simple_span(264.0).with_pin(132.0);
//! assert_eq!(supports.pins, vec![0.0, 264.0, 132.0]);
//! assert_eq!(supports.left, Anchor::Free);
//! assert_eq!(supports.restraint_count(), 3);
//! assert_eq!(supports.reaction_label(2), "Cy");
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Boundary condition at a beam end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Anchor {
    /// No restraint from the anchor itself (a pin may still sit at the end)
    ///
    /// - Vertical displacement: free
    /// - Rotation: free
    #[default]
    Free,

    /// Clamped end
    ///
    /// - Vertical displacement: restrained (Δ = 0)
    /// - Rotation: restrained (θ = 0)
    /// - Creates force and moment reactions
    Fixed,
}

impl Anchor {
    /// Number of restraints the anchor provides
    pub fn restraints(&self) -> usize {
        match self {
            Anchor::Free => 0,
            Anchor::Fixed => 2,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Anchor::Free => "Free",
            Anchor::Fixed => "Fixed",
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which end of the beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Short label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Pins plus end anchors
///
/// # JSON Format
/// ```json
/// { "pins": [0.0, 264.0], "left": "Free", "right": "Free" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportConfig {
    /// Pin positions (in), in insertion order
    pub pins: Vec<f64>,
    /// Left end anchor
    #[serde(default)]
    pub left: Anchor,
    /// Right end anchor
    #[serde(default)]
    pub right: Anchor,
}

impl SupportConfig {
    /// No supports at all; add pins with [`with_pin`](Self::with_pin)
    pub fn new() -> Self {
        SupportConfig {
            pins: Vec::new(),
            left: Anchor::Free,
            right: Anchor::Free,
        }
    }

    /// Pins at both ends, free anchors
    pub fn simple_span(length_in: f64) -> Self {
        SupportConfig::new().with_pin(0.0).with_pin(length_in)
    }

    /// Both ends clamped, no pins
    pub fn fixed_fixed() -> Self {
        SupportConfig::new()
            .with_anchor(Side::Left, Anchor::Fixed)
            .with_anchor(Side::Right, Anchor::Fixed)
    }

    /// Append a pin (builder pattern)
    pub fn with_pin(mut self, position_in: f64) -> Self {
        self.pins.push(position_in);
        self
    }

    /// Set an end anchor (builder pattern)
    pub fn with_anchor(mut self, side: Side, anchor: Anchor) -> Self {
        match side {
            Side::Left => self.left = anchor,
            Side::Right => self.right = anchor,
        }
        self
    }

    /// Anchor at a side
    pub fn anchor(&self, side: Side) -> Anchor {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Sides that carry a fixed anchor, left first
    pub fn fixed_sides(&self) -> Vec<Side> {
        [Side::Left, Side::Right]
            .into_iter()
            .filter(|side| self.anchor(*side) == Anchor::Fixed)
            .collect()
    }

    /// Pins plus two per fixed anchor
    pub fn restraint_count(&self) -> usize {
        self.pins.len() + self.left.restraints() + self.right.restraints()
    }

    /// Reaction label for pin `index`: `Ay`, `By`, ... `Zy`, then `R27y`...
    pub fn reaction_label(&self, index: usize) -> String {
        reaction_label(index)
    }

    /// Validate against a beam of the given length
    pub fn validate(&self, length_in: f64) -> CalcResult<()> {
        for (i, &pin) in self.pins.iter().enumerate() {
            if !pin.is_finite() || pin < 0.0 || pin > length_in {
                return Err(CalcError::invalid_input(
                    format!("supports.pins[{}]", i),
                    pin.to_string(),
                    format!("Pin must lie on the beam [0, {}]", length_in),
                ));
            }
        }

        if self.restraint_count() < 2 {
            return Err(CalcError::invalid_input(
                "supports",
                format!(
                    "{} pin(s), left {}, right {}",
                    self.pins.len(),
                    self.left,
                    self.right
                ),
                "At least two supports are required (a fixed anchor counts as two)",
            ));
        }

        Ok(())
    }
}

impl Default for SupportConfig {
    /// Simple span over the default 264 in beam
    fn default() -> Self {
        SupportConfig::simple_span(22.0 * 12.0)
    }
}

/// Reaction label for the pin at insertion index `index`
pub fn reaction_label(index: usize) -> String {
    if index < 26 {
        format!("{}y", (b'A' + index as u8) as char)
    } else {
        format!("R{}y", index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_restraints() {
        assert_eq!(Anchor::Free.restraints(), 0);
        assert_eq!(Anchor::Fixed.restraints(), 2);
        assert_eq!(Anchor::default(), Anchor::Free);
    }

    #[test]
    fn test_reaction_labels() {
        assert_eq!(reaction_label(0), "Ay");
        assert_eq!(reaction_label(1), "By");
        assert_eq!(reaction_label(25), "Zy");
        assert_eq!(reaction_label(26), "R27y");
    }

    #[test]
    fn test_validation_requires_two_restraints() {
        let single = SupportConfig::new().with_pin(0.0);
        let err = single.validate(264.0).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");

        // A clamped end alone is a valid cantilever
        let cantilever = SupportConfig::new().with_anchor(Side::Left, Anchor::Fixed);
        assert!(cantilever.validate(264.0).is_ok());

        assert!(SupportConfig::fixed_fixed().validate(264.0).is_ok());
        assert!(SupportConfig::simple_span(264.0).validate(264.0).is_ok());
    }

    #[test]
    fn test_validation_rejects_pins_off_beam() {
        let supports = SupportConfig::simple_span(264.0).with_pin(300.0);
        assert!(supports.validate(264.0).is_err());

        let supports = SupportConfig::simple_span(264.0).with_pin(f64::NAN);
        assert!(supports.validate(264.0).is_err());
    }

    #[test]
    fn test_fixed_sides() {
        let supports = SupportConfig::new()
            .with_pin(264.0)
            .with_anchor(Side::Left, Anchor::Fixed);
        assert_eq!(supports.fixed_sides(), vec![Side::Left]);
        assert_eq!(supports.restraint_count(), 3);
    }

    #[test]
    fn test_serialization_defaults_anchors() {
        let parsed: SupportConfig = serde_json::from_str(r#"{ "pins": [0.0, 132.0, 264.0] }"#).unwrap();
        assert_eq!(parsed.pins.len(), 3);
        assert_eq!(parsed.left, Anchor::Free);
        assert_eq!(parsed.right, Anchor::Free);
    }
}
