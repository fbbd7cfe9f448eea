//! # Diagram Analysis
//!
//! Extrema and zero crossings of a sampled shear / moment / deflection grid.
//!
//! ## Rules
//!
//! - Extrema: one ascending scan; on ties the first occurrence wins.
//! - Zero crossing: a crossing exists between two adjacent samples when the
//!   current sample's sign differs from the sign of the last non-zero sample.
//!   Zero samples never create a crossing by themselves. When several
//!   crossings exist, the pair with the smallest `|prev| + |curr|` is chosen
//!   (earliest on ties) and the position is linearly interpolated.
//!
//! ## Example
//!
//! ```rust
//! use beamcase_core::calculations::diagram::{find_extrema, find_zero_crossing};
//! use beamcase_core::calculations::{Channel, DiagramSample};
//!
//! let samples = vec![
//!     DiagramSample::new(0.0, -1.0, 0.0, 0.0),
//!     DiagramSample::new(1.0, 1.0, 0.0, 0.0),
//! ];
//!
//! assert_eq!(find_zero_crossing(&samples, Channel::V).unwrap(), 0.5);
//!
//! let extrema = find_extrema(&samples, Channel::V).unwrap();
//! assert_eq!(extrema.max, 1.0);
//! assert_eq!(extrema.argmin, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

use super::response::{Channel, DiagramSample};

/// Extreme values of one channel and where they occur
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremaResult {
    pub max: f64,
    /// Position of the first maximum
    pub argmax: f64,
    pub min: f64,
    /// Position of the first minimum
    pub argmin: f64,
}

/// Everything the reports need from one response grid
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramAnalysis {
    pub shear: ExtremaResult,
    pub moment: ExtremaResult,
    pub deflection: ExtremaResult,
    /// Where shear changes sign (or why it doesn't)
    pub shear_zero: CalcResult<f64>,
    /// Where moment changes sign (or why it doesn't)
    pub moment_zero: CalcResult<f64>,
}

impl DiagramAnalysis {
    /// Extrema of a channel
    pub fn extrema(&self, channel: Channel) -> &ExtremaResult {
        match channel {
            Channel::V => &self.shear,
            Channel::M => &self.moment,
            Channel::Y => &self.deflection,
        }
    }
}

/// Reject grids that cannot be analyzed
fn check_samples(samples: &[DiagramSample]) -> CalcResult<()> {
    if samples.len() < 2 {
        return Err(CalcError::invalid_input(
            "samples",
            samples.len().to_string(),
            "At least two samples are required",
        ));
    }

    for (k, pair) in samples.windows(2).enumerate() {
        if !(pair[1].x > pair[0].x) {
            return Err(CalcError::invalid_input(
                format!("samples[{}].x", k + 1),
                pair[1].x.to_string(),
                format!("Positions must be strictly increasing (previous {})", pair[0].x),
            ));
        }
    }

    Ok(())
}

/// Maximum and minimum of a channel with their locations
pub fn find_extrema(samples: &[DiagramSample], channel: Channel) -> CalcResult<ExtremaResult> {
    check_samples(samples)?;

    let first = &samples[0];
    let mut result = ExtremaResult {
        max: first.value(channel),
        argmax: first.x,
        min: first.value(channel),
        argmin: first.x,
    };

    for sample in &samples[1..] {
        let value = sample.value(channel);
        if value > result.max {
            result.max = value;
            result.argmax = sample.x;
        }
        if value < result.min {
            result.min = value;
            result.argmin = sample.x;
        }
    }

    Ok(result)
}

/// Interpolated position where a channel changes sign
///
/// # Errors
///
/// - `NoSignChange` when the channel keeps one sign or is identically zero
/// - `InvalidInput` for fewer than two samples or non-increasing positions
pub fn find_zero_crossing(samples: &[DiagramSample], channel: Channel) -> CalcResult<f64> {
    check_samples(samples)?;

    // (index of current sample, combined magnitude)
    let mut best: Option<(usize, f64)> = None;
    let mut last_sign = 0.0;

    for (k, sample) in samples.iter().enumerate() {
        let value = sample.value(channel);
        if value == 0.0 {
            continue;
        }
        let sign = value.signum();
        if last_sign != 0.0 && sign != last_sign && k > 0 {
            let prev = samples[k - 1].value(channel);
            let magnitude = prev.abs() + value.abs();
            if best.map_or(true, |(_, m)| magnitude < m) {
                best = Some((k, magnitude));
            }
        }
        last_sign = sign;
    }

    if last_sign == 0.0 {
        return Err(CalcError::no_sign_change(
            channel.name(),
            "channel is identically zero, crossing is ambiguous",
        ));
    }

    let (k, magnitude) = best.ok_or_else(|| {
        CalcError::no_sign_change(
            channel.name(),
            if last_sign > 0.0 {
                "all samples are non-negative"
            } else {
                "all samples are non-positive"
            },
        )
    })?;

    let prev = &samples[k - 1];
    let curr = &samples[k];
    let fraction = prev.value(channel).abs() / magnitude;
    Ok(prev.x + fraction * (curr.x - prev.x))
}

/// Extrema of every channel plus the shear and moment crossings
pub fn analyze_diagram(samples: &[DiagramSample]) -> CalcResult<DiagramAnalysis> {
    Ok(DiagramAnalysis {
        shear: find_extrema(samples, Channel::V)?,
        moment: find_extrema(samples, Channel::M)?,
        deflection: find_extrema(samples, Channel::Y)?,
        shear_zero: find_zero_crossing(samples, Channel::V),
        moment_zero: find_zero_crossing(samples, Channel::M),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shear(points: &[(f64, f64)]) -> Vec<DiagramSample> {
        points
            .iter()
            .map(|&(x, v)| DiagramSample::new(x, v, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn test_extrema_strictly_decreasing() {
        let samples = shear(&[(0.0, 3.0), (1.0, 2.0), (2.0, 1.0), (3.0, -4.0)]);
        let e = find_extrema(&samples, Channel::V).unwrap();
        assert_eq!(e.max, 3.0);
        assert_eq!(e.argmax, 0.0);
        assert_eq!(e.min, -4.0);
        assert_eq!(e.argmin, 3.0);
    }

    #[test]
    fn test_extrema_first_occurrence_wins() {
        let samples = shear(&[(0.0, 1.0), (1.0, 5.0), (2.0, 5.0), (3.0, -2.0), (4.0, -2.0)]);
        let e = find_extrema(&samples, Channel::V).unwrap();
        assert_eq!(e.argmax, 1.0);
        assert_eq!(e.argmin, 3.0);
    }

    #[test]
    fn test_simple_crossing() {
        let samples = shear(&[(0.0, -1.0), (1.0, 1.0)]);
        assert_eq!(find_zero_crossing(&samples, Channel::V).unwrap(), 0.5);
    }

    #[test]
    fn test_interpolated_crossing() {
        let samples = shear(&[(0.0, 3.0), (2.0, 1.0), (4.0, -3.0)]);
        // 2 + 1/4 * 2
        assert_eq!(find_zero_crossing(&samples, Channel::V).unwrap(), 2.5);
    }

    #[test]
    fn test_all_positive_has_no_crossing() {
        let samples = shear(&[(0.0, 1.0), (1.0, 2.0), (2.0, 0.5)]);
        let err = find_zero_crossing(&samples, Channel::V).unwrap_err();
        assert_eq!(err.error_code(), "NO_SIGN_CHANGE");
    }

    #[test]
    fn test_all_zero_is_ambiguous() {
        let samples = shear(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let err = find_zero_crossing(&samples, Channel::V).unwrap_err();
        assert!(matches!(err, CalcError::NoSignChange { .. }));
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn test_zero_samples_do_not_flip() {
        // Touches zero without changing sign
        let samples = shear(&[(0.0, 2.0), (1.0, 0.0), (2.0, 3.0)]);
        assert!(find_zero_crossing(&samples, Channel::V).is_err());

        // Zero at the ends of a positive channel (moment of a simple span)
        let samples = shear(&[(0.0, 0.0), (1.0, 4.0), (2.0, 0.0)]);
        assert!(find_zero_crossing(&samples, Channel::V).is_err());
    }

    #[test]
    fn test_smallest_magnitude_pair_chosen() {
        // Two crossings: (10, -10) combined 20, (1, -1) combined 2
        let samples = shear(&[(0.0, 10.0), (1.0, -10.0), (2.0, -5.0), (3.0, -1.0), (4.0, 1.0)]);
        assert_eq!(find_zero_crossing(&samples, Channel::V).unwrap(), 3.5);
    }

    #[test]
    fn test_equal_magnitudes_earliest_wins() {
        let samples = shear(&[(0.0, 1.0), (1.0, -1.0), (2.0, 1.0)]);
        assert_eq!(find_zero_crossing(&samples, Channel::V).unwrap(), 0.5);
    }

    #[test]
    fn test_too_few_samples() {
        let err = find_extrema(&[], Channel::M).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");

        let err = find_zero_crossing(&shear(&[(0.0, 1.0)]), Channel::V).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_non_increasing_positions_rejected() {
        let samples = shear(&[(0.0, 1.0), (1.0, -1.0), (1.0, 2.0)]);
        assert!(analyze_diagram(&samples).is_err());
    }

    #[test]
    fn test_analyze_keeps_missing_crossing() {
        let samples = vec![
            DiagramSample::new(0.0, 5.0, 0.0, 0.0),
            DiagramSample::new(1.0, 0.0, 2.5, -0.1),
            DiagramSample::new(2.0, -5.0, 0.0, 0.0),
        ];
        let analysis = analyze_diagram(&samples).unwrap();
        assert_eq!(analysis.shear_zero.clone().unwrap(), 1.0);
        assert!(analysis.moment_zero.is_err());
        assert_eq!(analysis.extrema(Channel::Y).min, -0.1);
        assert_eq!(analysis.extrema(Channel::Y).argmin, 1.0);
    }
}
