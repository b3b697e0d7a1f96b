#![forbid(unsafe_code)]

//! Draw-function registry keyed by tile kind.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tilecast_raster::Surface;

use crate::content::TileContent;

/// Pure draw callback: `(surface, w, h, data)`.
///
/// Must be deterministic for a given payload; the scene only calls it when
/// the payload's signature changed.
pub type DrawFn<D> = Arc<dyn Fn(&mut Surface, u32, u32, &D) + Send + Sync>;

/// Maps each tile kind to the function that draws it.
pub struct RendererRegistry<D: TileContent> {
    renderers: HashMap<D::Kind, DrawFn<D>>,
}

impl<D: TileContent> RendererRegistry<D> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Register (or replace) the draw function for `kind`.
    pub fn register<F>(&mut self, kind: D::Kind, draw: F) -> &mut Self
    where
        F: Fn(&mut Surface, u32, u32, &D) + Send + Sync + 'static,
    {
        self.renderers.insert(kind, Arc::new(draw));
        self
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with<F>(mut self, kind: D::Kind, draw: F) -> Self
    where
        F: Fn(&mut Surface, u32, u32, &D) + Send + Sync + 'static,
    {
        self.register(kind, draw);
        self
    }

    /// The draw function for `kind`, if any.
    pub fn get(&self, kind: D::Kind) -> Option<DrawFn<D>> {
        self.renderers.get(&kind).cloned()
    }

    pub fn contains(&self, kind: D::Kind) -> bool {
        self.renderers.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl<D: TileContent> Default for RendererRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: TileContent> fmt::Debug for RendererRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.renderers.keys()).finish()
    }
}
