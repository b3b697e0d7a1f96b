#![forbid(unsafe_code)]

//! Stacking buckets.

use serde::{Deserialize, Serialize};

/// Small ordinal stacking bucket, sent on the wire as `0..=3`.
///
/// The remote derives a default depth offset from the layer when no explicit
/// `z` is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Layer {
    /// Regular content.
    #[default]
    Base = 0,
    /// Hover highlights.
    Hover = 1,
    /// Drag ghosts.
    Drag = 2,
    /// Overlays above everything else.
    Overlay = 3,
}

impl Layer {
    /// All layers, bottom to top.
    pub const ALL: [Self; 4] = [Self::Base, Self::Hover, Self::Drag, Self::Overlay];

    /// Wire ordinal.
    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> Self {
        layer.ordinal()
    }
}

/// Rejected layer ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLayer(pub u8);

impl std::fmt::Display for InvalidLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid layer ordinal {} (expected 0..=3)", self.0)
    }
}

impl std::error::Error for InvalidLayer {}

impl TryFrom<u8> for Layer {
    type Error = InvalidLayer;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(InvalidLayer(value))
    }
}
