#![forbid(unsafe_code)]

//! Typed tile payloads.
//!
//! A scene is generic over one payload type `D: TileContent`, usually a
//! closed enum with one variant per tile kind. The payload names its kind
//! (which selects the draw function) and computes its own content
//! [`Signature`], so the scene can tell "pixels changed" apart from
//! "position changed" without diffing pixels.

use std::collections::hash_map::DefaultHasher;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

/// Opaque fingerprint of a payload's visual content.
///
/// Equal signatures mean "draws the same pixels". The scene trusts this
/// completely: a payload that changes pixels without changing its
/// signature will not be redrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(u64);

impl Signature {
    /// Wrap a caller-computed fingerprint.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Hash any value into a signature.
    pub fn of<T: Hash + ?Sized>(value: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// The raw fingerprint.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Payload consumed by exactly one draw function.
pub trait TileContent {
    /// Closed set of tile kinds; keys the renderer registry and the quality
    /// table.
    type Kind: Copy + Eq + Hash + Debug;

    /// Which draw function renders this payload.
    fn kind(&self) -> Self::Kind;

    /// Fingerprint of everything that affects the drawn pixels.
    fn signature(&self) -> Signature;
}
