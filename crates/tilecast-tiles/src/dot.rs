#![forbid(unsafe_code)]

//! Status dot: a centred disc with an optional soft halo.

use tilecast_raster::{PackedRgba, Surface};

/// Draw the dot. The halo takes the outer third of the radius.
pub fn draw(surface: &mut Surface, w: u32, h: u32, color: PackedRgba, glow: bool) {
    let cx = w as f32 / 2.0;
    let cy = h as f32 / 2.0;
    let outer = cx.min(cy);
    if glow {
        surface.fill_circle(cx, cy, outer, color.with_opacity(0.25));
        surface.fill_circle(cx, cy, outer * 0.8, color.with_opacity(0.4));
    }
    surface.fill_circle(cx, cy, outer * 0.6, color);
}
