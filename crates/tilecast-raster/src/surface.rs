#![forbid(unsafe_code)]

//! Fixed-size RGBA drawing surface owned by a single tile.
//!
//! A [`Surface`] is allocated once from the tile's pixel dimensions and never
//! resized. Draw functions paint into it with the primitives below; all
//! primitives clip to the surface bounds, so callers may pass coordinates that
//! extend past the edges (or are negative) without checks.
//!
//! Fill primitives composite with SourceOver; [`Surface::clear`] and
//! [`Surface::set_pixel`] replace.

use crate::color::PackedRgba;

/// RGBA raster with row-major storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<PackedRgba>,
}

/// Clip a span starting at `start` with length `len` to `[0, limit)`.
///
/// Returns the half-open `[lo, hi)` range, or `None` when nothing remains.
#[inline]
fn clip_span(start: i32, len: u32, limit: u32) -> Option<(u32, u32)> {
    let lo = i64::from(start).max(0);
    let hi = (i64::from(start) + i64::from(len)).min(i64::from(limit));
    (lo < hi).then(|| (lo as u32, hi as u32))
}

impl Surface {
    /// Create a transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![PackedRgba::TRANSPARENT; size],
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

    /// `(width, height)` pair.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True when the surface holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Row-major pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Replace every pixel with `color`.
    pub fn clear(&mut self, color: PackedRgba) {
        self.pixels.fill(color);
    }

    /// Read a pixel. Out-of-bounds reads return [`PackedRgba::TRANSPARENT`].
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> PackedRgba {
        if x < self.width && y < self.height {
            self.pixels[self.index(x, y)]
        } else {
            PackedRgba::TRANSPARENT
        }
    }

    /// Overwrite a pixel (no blending). Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: PackedRgba) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            let idx = self.index(x as u32, y as u32);
            self.pixels[idx] = color;
        }
    }

    /// Composite a pixel with SourceOver. Out-of-bounds writes are ignored.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: PackedRgba) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            let idx = self.index(x as u32, y as u32);
            self.pixels[idx] = color.over(self.pixels[idx]);
        }
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: PackedRgba) {
        let (Some((x0, x1)), Some((y0, y1))) =
            (clip_span(x, w, self.width), clip_span(y, h, self.height))
        else {
            return;
        };
        let opaque = color.a() == 255;
        for row in y0..y1 {
            let start = self.index(x0, row);
            let end = self.index(x1, row);
            let span = &mut self.pixels[start..end];
            if opaque {
                span.fill(color);
            } else {
                for px in span {
                    *px = color.over(*px);
                }
            }
        }
    }

    /// Outline a rectangle with the given stroke thickness, drawn inward.
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: u32, h: u32, thickness: u32, color: PackedRgba) {
        if w == 0 || h == 0 || thickness == 0 {
            return;
        }
        let t = thickness.min(w.div_ceil(2)).min(h.div_ceil(2));
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, y + (h - t) as i32, w, t, color);
        let inner_h = h.saturating_sub(2 * t);
        self.fill_rect(x, y + t as i32, t, inner_h, color);
        self.fill_rect(x + (w - t) as i32, y + t as i32, t, inner_h, color);
    }

    /// Fill a rectangle with circular corners of `radius` pixels.
    ///
    /// A pixel is covered when its centre lies inside the rounded shape.
    pub fn fill_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        radius: f32,
        color: PackedRgba,
    ) {
        let r = radius.clamp(0.0, w.min(h) as f32 / 2.0);
        if r < 0.5 {
            self.fill_rect(x, y, w, h, color);
            return;
        }
        let (Some((x0, x1)), Some((y0, y1))) =
            (clip_span(x, w, self.width), clip_span(y, h, self.height))
        else {
            return;
        };
        let left = x as f32 + r;
        let right = x as f32 + w as f32 - r;
        let top = y as f32 + r;
        let bottom = y as f32 + h as f32 - r;
        let r2 = r * r;
        for py in y0..y1 {
            let cy = py as f32 + 0.5;
            let ny = cy.clamp(top, bottom);
            for px in x0..x1 {
                let cx = px as f32 + 0.5;
                let nx = cx.clamp(left, right);
                let (dx, dy) = (cx - nx, cy - ny);
                if dx * dx + dy * dy <= r2 {
                    let idx = self.index(px, py);
                    self.pixels[idx] = color.over(self.pixels[idx]);
                }
            }
        }
    }

    /// Fill a disc centred at `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: PackedRgba) {
        if radius <= 0.0 {
            return;
        }
        let x = (cx - radius).floor() as i32;
        let y = (cy - radius).floor() as i32;
        let span = (radius * 2.0).ceil() as u32 + 1;
        let (Some((x0, x1)), Some((y0, y1))) =
            (clip_span(x, span, self.width), clip_span(y, span, self.height))
        else {
            return;
        };
        let r2 = radius * radius;
        for py in y0..y1 {
            let dy = py as f32 + 0.5 - cy;
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    let idx = self.index(px, py);
                    self.pixels[idx] = color.over(self.pixels[idx]);
                }
            }
        }
    }

    /// Draw a one-pixel line with Bresenham's algorithm.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: PackedRgba) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.blend_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Fill a rectangle with a top-to-bottom gradient.
    pub fn fill_vertical_gradient(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        top: PackedRgba,
        bottom: PackedRgba,
    ) {
        if h == 0 {
            return;
        }
        let denom = (h.saturating_sub(1)).max(1) as f32;
        for row in 0..h {
            let color = top.lerp(bottom, row as f32 / denom);
            self.fill_rect(x, y + row as i32, w, 1, color);
        }
    }
}
