//! # Run Configuration
//!
//! The `RunConfig` struct is the root container for one load-combination run.
//! Run files are human-readable JSON; every section except `version` may be
//! omitted and falls back to the reference beam.
//!
//! ## Structure
//!
//! ```text
//! RunConfig
//! ├── version: schema version ("0.1.0")
//! ├── beam: BeamProperties (length, I, E, area, specific weight)
//! ├── loads: LoadModelConfig (tributary width, D, Lr, snow, wind)
//! ├── supports: SupportConfig (default: pins at 0 and L)
//! ├── combinations: Vec<CombinationSpec> (default: 16-entry table)
//! └── output: OutputOptions (resolution, decimal places, parallel)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use beamcase_core::config::RunConfig;
//!
//! let config: RunConfig = serde_json::from_str(r#"{ "version": "0.1.0" }"#).unwrap();
//! assert_eq!(config.combinations.len(), 16);
//! assert_eq!(config.resolution().unwrap(), 2640);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{BeamProperties, SupportConfig};
use crate::errors::{CalcError, CalcResult};
use crate::loads::{default_combinations, generate_scenarios, CombinationSpec, LoadModel, LoadModelConfig, Scenario};
use crate::report::DEFAULT_PLACES;

/// Current schema version for run files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Largest accepted number of grid intervals over the beam
pub const MAX_INTERVALS: usize = 1_000_000;

/// Report and sampling options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Grid intervals per inch of beam (10 = every tenth of an inch)
    pub resolution_per_inch: f64,
    /// Decimal places in engineering notation
    pub decimal_places: usize,
    /// Process scenarios on the rayon thread pool
    pub parallel: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions {
            resolution_per_inch: 10.0,
            decimal_places: DEFAULT_PLACES,
            parallel: false,
        }
    }
}

/// Root run container, serialized to `*.json` run files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Schema version for forward compatibility
    pub version: String,

    /// Beam under study
    #[serde(default)]
    pub beam: BeamProperties,

    /// Area loads and load shapes
    #[serde(default)]
    pub loads: LoadModelConfig,

    /// Default supports; `None` means pins at both ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports: Option<SupportConfig>,

    /// Combination table
    #[serde(default = "default_combinations")]
    pub combinations: Vec<CombinationSpec>,

    /// Sampling and report options
    #[serde(default)]
    pub output: OutputOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            version: SCHEMA_VERSION.to_string(),
            beam: BeamProperties::default(),
            loads: LoadModelConfig::default(),
            supports: None,
            combinations: default_combinations(),
            output: OutputOptions::default(),
        }
    }
}

impl RunConfig {
    /// Support configuration used by combinations without an override
    pub fn default_supports(&self) -> SupportConfig {
        self.supports
            .clone()
            .unwrap_or_else(|| SupportConfig::simple_span(self.beam.length_in))
    }

    /// Number of grid intervals for the beam, at most [`MAX_INTERVALS`]
    pub fn resolution(&self) -> CalcResult<usize> {
        let per_inch = self.output.resolution_per_inch;
        if !per_inch.is_finite() || per_inch <= 0.0 {
            return Err(CalcError::invalid_input(
                "output.resolution_per_inch",
                per_inch.to_string(),
                "Resolution must be a positive finite number",
            ));
        }
        let intervals = (self.beam.length_in * per_inch).round();
        if !(intervals >= 1.0) {
            return Err(CalcError::invalid_input(
                "output.resolution_per_inch",
                per_inch.to_string(),
                "Resolution gives less than one interval over the beam",
            ));
        }
        if intervals > MAX_INTERVALS as f64 {
            return Err(CalcError::invalid_input(
                "output.resolution_per_inch",
                per_inch.to_string(),
                format!("Resolution gives {} intervals, more than the maximum of {}", intervals, MAX_INTERVALS),
            ));
        }
        Ok(intervals as usize)
    }

    /// Build the load model for this run
    pub fn load_model(&self) -> CalcResult<LoadModel> {
        LoadModel::new(&self.beam, &self.loads)
    }

    /// Resolve every combination into a scenario
    pub fn scenarios(&self) -> CalcResult<Vec<Scenario>> {
        generate_scenarios(&self.load_model()?, &self.combinations, &self.default_supports())
    }

    /// Validate the whole run before any scenario is solved
    pub fn validate(&self) -> CalcResult<()> {
        self.resolution()?;
        self.scenarios()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{Anchor, Side};

    #[test]
    fn test_default_run() {
        let config = RunConfig::default();
        assert_eq!(config.version, SCHEMA_VERSION);
        assert_eq!(config.resolution().unwrap(), 2640);
        assert_eq!(config.default_supports(), SupportConfig::simple_span(264.0));
        assert!(config.validate().is_ok());
        assert_eq!(config.scenarios().unwrap().len(), 16);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = RunConfig::default();
        config.supports = Some(SupportConfig::fixed_fixed());
        config.output.parallel = true;

        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let json = r#"{
            "version": "0.1.0",
            "beam": { "length_in": 120.0 },
            "supports": { "pins": [120.0], "left": "Fixed" },
            "combinations": [
                { "name": "D", "terms": [ { "component": "Dead", "factor": 1.0 } ] }
            ]
        }"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.beam.length_in, 120.0);
        assert_eq!(config.beam.elastic_modulus_psi, 29e6);
        assert_eq!(config.loads, LoadModelConfig::default());
        assert_eq!(config.resolution().unwrap(), 1200);

        let supports = config.default_supports();
        assert_eq!(supports.anchor(Side::Left), Anchor::Fixed);
        assert_eq!(config.scenarios().unwrap().len(), 1);
    }

    #[test]
    fn test_bad_resolution_rejected() {
        let mut config = RunConfig::default();
        config.output.resolution_per_inch = 0.0;
        assert!(config.validate().is_err());

        config.output.resolution_per_inch = 0.001;
        assert!(config.resolution().is_err());
    }

    #[test]
    fn test_resolution_capped() {
        let mut config = RunConfig::default();
        config.output.resolution_per_inch = 1e12;
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert!(err.to_string().contains("maximum"));

        // Exactly at the cap is accepted
        config.output.resolution_per_inch = MAX_INTERVALS as f64 / 264.0;
        assert_eq!(config.resolution().unwrap(), MAX_INTERVALS);
    }
}
