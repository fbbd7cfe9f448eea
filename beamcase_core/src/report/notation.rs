//! Engineering notation
//!
//! Numbers are written with an exponent that is a multiple of three, the way
//! an engineer reads kips and kip-inches off a calculator:
//!
//! | Value | Output (2 places) |
//! |-------|-------------------|
//! | `0` | `0` |
//! | `999` | `999.00` |
//! | `1000` | `1.00e3` |
//! | `-30000` | `-30.00e3` |
//! | `0.0042` | `0.00` |
//!
//! Values whose exponent would be below 3 are printed in fixed point with no
//! suffix. Ties round away from zero in both forms.

/// Default number of decimal places in reports
pub const DEFAULT_PLACES: usize = 2;

/// Format a number in engineering notation
///
/// # Example
/// ```
/// use beamcase_core::report::eng_notation;
///
/// assert_eq!(eng_notation(4123.74, 2), "4.12e3");
/// assert_eq!(eng_notation(-272_136.0, 1), "-272.1e3");
/// assert_eq!(eng_notation(0.0, 2), "0");
/// ```
pub fn eng_notation(value: f64, places: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let exponent = exponent_of(value);
    let text = if exponent < 3 {
        format!("{:.*}", places, round_half_away(value, places))
    } else {
        let coefficient = value / 10f64.powi(exponent);
        format!("{:.*}e{}", places, round_half_away(coefficient, places), exponent)
    };

    strip_negative_zero(text)
}

/// Round to `places` decimals, ties away from zero
fn round_half_away(value: f64, places: usize) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

/// `3 * floor(log10(|value|) / 3)`, corrected for log10 rounding
fn exponent_of(value: f64) -> i32 {
    let magnitude = value.abs();
    let mut exponent = ((magnitude.log10() / 3.0).floor() * 3.0) as i32;

    let coefficient = magnitude / 10f64.powi(exponent);
    if coefficient >= 1000.0 {
        exponent += 3;
    } else if coefficient < 1.0 {
        exponent -= 3;
    }
    exponent
}

/// `-0.00` -> `0.00`
fn strip_negative_zero(text: String) -> String {
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(eng_notation(999.0, 2), "999.00");
        assert_eq!(eng_notation(1000.0, 2), "1.00e3");
        assert_eq!(eng_notation(0.0, 2), "0");
        assert_eq!(eng_notation(-30000.0, 2), "-30.00e3");
    }

    #[test]
    fn test_large_exponents() {
        assert_eq!(eng_notation(1_234_567.0, 2), "1.23e6");
        assert_eq!(eng_notation(-272_136.0, 2), "-272.14e3");
        assert_eq!(eng_notation(1e9, 3), "1.000e9");
    }

    #[test]
    fn test_ties_round_away_from_zero_in_both_ranges() {
        assert_eq!(eng_notation(12.5, 0), "13");
        assert_eq!(eng_notation(12500.0, 0), "13e3");
        assert_eq!(eng_notation(1.125, 2), "1.13");
        assert_eq!(eng_notation(1125.0, 2), "1.13e3");
        assert_eq!(eng_notation(-2.5, 0), "-3");
        assert_eq!(eng_notation(-2500.0, 0), "-3e3");
    }

    #[test]
    fn test_small_values_use_fixed_point() {
        assert_eq!(eng_notation(0.0042, 2), "0.00");
        assert_eq!(eng_notation(-0.137, 2), "-0.14");
        assert_eq!(eng_notation(12.5, 0), "13");
        assert_eq!(eng_notation(31.24044, 2), "31.24");
    }

    #[test]
    fn test_negative_zero_after_rounding() {
        assert_eq!(eng_notation(-0.001, 2), "0.00");
        assert_eq!(eng_notation(-1e-12, 2), "0.00");
        assert_eq!(eng_notation(-0.0, 2), "0");
    }

    #[test]
    fn test_exponent_boundaries() {
        assert_eq!(exponent_of(1000.0), 3);
        assert_eq!(exponent_of(999.999), 0);
        assert_eq!(exponent_of(1e6), 6);
        assert_eq!(exponent_of(0.5), -3);
    }
}
