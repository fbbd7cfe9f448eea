//! Solved beam response
//!
//! The values a [`BeamSolver`](super::BeamSolver) hands back: the sampled
//! diagram and the support reactions.
//!
//! ## Sign Convention
//!
//! - Loads: positive downward
//! - Reactions: positive upward
//! - Shear: `dV/dx = -w`, so a left-end reaction shows up as positive shear
//! - Moment: `dM/dx = V`, positive is sagging
//! - Deflection: positive upward, `EI·y'' = M`

use serde::{Deserialize, Serialize};

use super::supports::Side;

/// One row of the response grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagramSample {
    /// Position (in)
    pub x: f64,
    /// Shear (lb)
    pub v: f64,
    /// Moment (lb-in)
    pub m: f64,
    /// Deflection (in)
    pub y: f64,
}

impl DiagramSample {
    /// Field names in declared order, used as the CSV header
    pub const FIELDS: [&'static str; 4] = ["x", "v", "m", "y"];

    /// Create a sample
    pub const fn new(x: f64, v: f64, m: f64, y: f64) -> Self {
        DiagramSample { x, v, m, y }
    }

    /// Value of a response channel
    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::V => self.v,
            Channel::M => self.m,
            Channel::Y => self.y,
        }
    }

    /// All four values in declared order
    pub fn values(&self) -> [f64; 4] {
        [self.x, self.v, self.m, self.y]
    }
}

/// A response channel of [`DiagramSample`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Shear
    V,
    /// Moment
    M,
    /// Deflection
    Y,
}

impl Channel {
    /// All channels in declared order
    pub const ALL: [Channel; 3] = [Channel::V, Channel::M, Channel::Y];

    /// Field name (`v`, `m`, `y`)
    pub fn name(&self) -> &'static str {
        match self {
            Channel::V => "v",
            Channel::M => "m",
            Channel::Y => "y",
        }
    }

    /// Upper-case symbol used in reports (`V`, `M`, `Y`)
    pub fn symbol(&self) -> &'static str {
        match self {
            Channel::V => "V",
            Channel::M => "M",
            Channel::Y => "Y",
        }
    }

    /// Unit label
    pub fn unit(&self) -> &'static str {
        match self {
            Channel::V => "lb",
            Channel::M => "lb-in",
            Channel::Y => "in",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pin reactions (lb, positive upward), indexed by pin insertion order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionSet(pub Vec<f64>);

impl ReactionSet {
    /// Reaction at pin `index`
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Number of reactions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no pins
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all pin reactions
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }
}

/// Reaction at a clamped end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorReaction {
    /// Which end
    pub side: Side,
    /// Vertical force (lb, positive upward)
    pub force: f64,
    /// Internal bending moment at the clamped end (lb-in)
    pub moment: f64,
}

/// Everything a solver returns for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedBeam {
    /// Pin reactions in insertion order
    pub reactions: ReactionSet,
    /// Reactions of fixed anchors, left first
    pub anchors: Vec<AnchorReaction>,
    /// Response grid, `resolution + 1` samples from x = 0 to x = L
    pub samples: Vec<DiagramSample>,
}

impl SolvedBeam {
    /// Total upward support force (pins and anchors)
    pub fn total_support_force(&self) -> f64 {
        self.reactions.total() + self.anchors.iter().map(|a| a.force).sum::<f64>()
    }

    /// Reaction at a fixed anchor, if that end is clamped
    pub fn anchor(&self, side: Side) -> Option<&AnchorReaction> {
        self.anchors.iter().find(|a| a.side == side)
    }
}
