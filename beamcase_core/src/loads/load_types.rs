//! Load component definitions
//!
//! The physical load types a combination can reference. Each component maps
//! to one [`StandardLoad`](super::StandardLoad) shape built by the
//! [`LoadModel`](super::LoadModel).

use serde::{Deserialize, Serialize};

/// Load components available to combinations
///
/// Wind is split into its two independent terms so combinations can pick the
/// uplift case or the downward pressure case separately.
///
/// # Example
/// ```
/// use beamcase_core::loads::LoadComponent;
///
/// assert_eq!(LoadComponent::Dead.code(), "D");
/// assert_eq!(LoadComponent::WindUplift.code(), "W1");
/// assert_eq!(LoadComponent::from_code("Lr"), Some(LoadComponent::RoofLive));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoadComponent {
    /// D - self-weight plus applied dead load
    Dead,
    /// Lr - roof live load
    RoofLive,
    /// S - tapering snow load
    Snow,
    /// W1 - constant wind uplift (acts upward)
    WindUplift,
    /// W2 - stepped wind pressure (acts downward)
    WindPressure,
    /// W - uplift and pressure acting together
    WindTotal,
}

impl LoadComponent {
    /// All components in standard order
    pub const ALL: [LoadComponent; 6] = [
        LoadComponent::Dead,
        LoadComponent::RoofLive,
        LoadComponent::Snow,
        LoadComponent::WindUplift,
        LoadComponent::WindPressure,
        LoadComponent::WindTotal,
    ];

    /// Standard abbreviation used in combination equations
    pub fn code(&self) -> &'static str {
        match self {
            LoadComponent::Dead => "D",
            LoadComponent::RoofLive => "Lr",
            LoadComponent::Snow => "S",
            LoadComponent::WindUplift => "W1",
            LoadComponent::WindPressure => "W2",
            LoadComponent::WindTotal => "W",
        }
    }

    /// Parse an abbreviation back into a component
    pub fn from_code(code: &str) -> Option<LoadComponent> {
        LoadComponent::ALL.iter().copied().find(|c| c.code() == code)
    }
}

impl std::fmt::Display for LoadComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
