//! One-line scenario description
//!
//! The `<scenario>.txt` artifact, also used as the plot caption:
//!
//! ```text
//! C1.00 (1.4D): Ay: 4.12e3 lb, By: 4.12e3 lb, V: -4.12e3 lb to 4.12e3 lb, M: 0 lb-in to 272.17e3 lb-in, Y: -0.17 in to 0 in
//! ```

use crate::calculations::{Channel, DiagramAnalysis, SolvedBeam};
use crate::calculations::supports::reaction_label;

use super::notation::eng_notation;

/// Describe a solved scenario on a single whitespace-normalized line
pub fn describe_scenario(
    name: &str,
    equation: &str,
    solved: &SolvedBeam,
    analysis: &DiagramAnalysis,
    places: usize,
) -> String {
    let eng = |v: f64| eng_notation(v, places);
    let mut parts = Vec::new();

    for (i, force) in solved.reactions.iter().enumerate() {
        parts.push(format!("{}: {} lb", reaction_label(i), eng(*force)));
    }
    for anchor in &solved.anchors {
        parts.push(format!(
            "{} anchor: {} lb, {} lb-in",
            anchor.side.label(),
            eng(anchor.force),
            eng(anchor.moment)
        ));
    }
    for channel in Channel::ALL {
        let e = analysis.extrema(channel);
        parts.push(format!(
            "{}: {} {unit} to {} {unit}",
            channel.symbol(),
            eng(e.min),
            eng(e.max),
            unit = channel.unit()
        ));
    }

    let heading = if equation.trim().is_empty() {
        format!("{}:", name)
    } else {
        format!("{} ({}):", name, equation)
    };

    normalize_whitespace(&format!("{} {}", heading, parts.join(", ")))
}

/// Collapse every run of whitespace (including line breaks) to one space
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
