#![forbid(unsafe_code)]

//! Per-kind encode quality.

use std::collections::HashMap;
use std::hash::Hash;

use tilecast_raster::Quality;

/// Lossy quality factor per tile kind.
///
/// Kinds without an entry fall back to the scene's
/// [`default_quality`](crate::SceneConfig::default_quality).
#[derive(Debug, Clone)]
pub struct QualityTable<K> {
    entries: HashMap<K, Quality>,
}

impl<K: Copy + Eq + Hash> QualityTable<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Set the quality for `kind`.
    pub fn set(&mut self, kind: K, quality: f32) -> &mut Self {
        self.entries.insert(kind, Quality::new(quality));
        self
    }

    #[must_use]
    pub fn with(mut self, kind: K, quality: f32) -> Self {
        self.set(kind, quality);
        self
    }

    /// Quality configured for `kind`, if any.
    pub fn get(&self, kind: K) -> Option<Quality> {
        self.entries.get(&kind).copied()
    }

    /// Quality for `kind`, or `fallback`.
    pub fn resolve(&self, kind: K, fallback: Quality) -> Quality {
        self.get(kind).unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Copy + Eq + Hash> Default for QualityTable<K> {
    fn default() -> Self {
        Self::new()
    }
}
