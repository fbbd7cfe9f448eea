//! # Unit Types
//!
//! Lightweight newtype wrappers for the US customary units used by the load
//! model. They serialize as plain numbers.
//!
//! Internally every length is in inches, every force in pounds, and every
//! distributed load in pounds per inch. Area loads are given in psf and
//! converted with a tributary width.
//!
//! ## Example
//!
//! ```rust
//! use beamcase_core::units::{Feet, Inches, Psf};
//!
//! let span: Inches = Feet(22.0).into();
//! assert_eq!(span.0, 264.0);
//!
//! // 20 psf over a 12 ft tributary width is 20 lb/in
//! let line = Psf(20.0).over_width(Feet(12.0));
//! assert_eq!(line.0, 20.0);
//! ```

use serde::{Deserialize, Serialize};

/// Inches per foot
pub const IN_PER_FT: f64 = 12.0;

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * IN_PER_FT)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / IN_PER_FT)
    }
}

/// Area load in pounds per square foot
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Psf(pub f64);

/// Distributed line load in pounds per inch
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LbPerIn(pub f64);

impl Psf {
    /// Convert to a line load acting on a beam carrying `width` of floor/roof
    pub fn over_width(self, width: Feet) -> LbPerIn {
        // psf * ft = plf; plf / 12 = lb/in
        LbPerIn(self.0 * width.0 / IN_PER_FT)
    }
}
