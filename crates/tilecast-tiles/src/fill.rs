#![forbid(unsafe_code)]

use tilecast_raster::{PackedRgba, Surface};

/// Flat fill, optionally with rounded corners.
pub fn draw(surface: &mut Surface, w: u32, h: u32, color: PackedRgba, radius: u8) {
    surface.fill_rounded_rect(0, 0, w, h, f32::from(radius), color);
}
