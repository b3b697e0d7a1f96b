#![forbid(unsafe_code)]

//! Export-surface pool keyed by pixel size.
//!
//! Encoding a tile needs an opaque RGB staging buffer of the tile's exact
//! dimensions. Tiles of the same size share one staging buffer: the pool owns
//! it and lends it out for the duration of a single encode. The pool is
//! append-only; entries are never evicted.

use std::collections::HashMap;

use crate::color::PackedRgba;
use crate::surface::Surface;

/// Opaque RGB8 staging buffer handed to a [`BitmapEncoder`](crate::encode::BitmapEncoder).
#[derive(Debug, Clone)]
pub struct ExportSurface {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl ExportSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgb: vec![0; width as usize * height as usize * 3],
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed `R, G, B` bytes, row-major.
    #[inline]
    pub fn as_rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// Flatten `src` onto `background` into this buffer.
    ///
    /// # Panics
    ///
    /// Panics if `src` does not match this buffer's dimensions. The pool only
    /// hands out buffers keyed by the requesting surface's size.
    pub fn copy_from(&mut self, src: &Surface, background: PackedRgba) {
        assert_eq!(
            src.size(),
            (self.width, self.height),
            "export surface size mismatch"
        );
        for (dst, px) in self.rgb.chunks_exact_mut(3).zip(src.pixels()) {
            dst.copy_from_slice(&px.flatten_onto(background));
        }
    }
}

/// Size-keyed arena of [`ExportSurface`]s.
#[derive(Debug, Default)]
pub struct SurfacePool {
    surfaces: HashMap<(u32, u32), ExportSurface>,
    checkouts: u64,
}

impl SurfacePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the staging buffer for `(width, height)`, allocating it on first use.
    pub fn checkout(&mut self, width: u32, height: u32) -> &mut ExportSurface {
        self.checkouts += 1;
        self.surfaces
            .entry((width, height))
            .or_insert_with(|| ExportSurface::new(width, height))
    }

    /// Number of distinct sizes allocated so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// True when nothing has been allocated yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Whether a buffer for this size exists.
    #[inline]
    pub fn contains(&self, width: u32, height: u32) -> bool {
        self.surfaces.contains_key(&(width, height))
    }

    /// Total number of checkouts served (hits and misses).
    #[inline]
    pub fn checkouts(&self) -> u64 {
        self.checkouts
    }
}
