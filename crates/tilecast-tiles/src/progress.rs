#![forbid(unsafe_code)]

use tilecast_raster::{PackedRgba, Surface};

use crate::palette;

/// Horizontal bar: muted track with a filled portion of `fraction` (clamped).
pub fn draw(surface: &mut Surface, w: u32, h: u32, fraction: f32, color: PackedRgba) {
    let radius = h as f32 / 2.0;
    surface.fill_rounded_rect(0, 0, w, h, radius, palette::MUTED);
    let filled = filled_width(w, fraction);
    if filled > 0 {
        surface.fill_rounded_rect(0, 0, filled, h, radius, color);
    }
}

/// Pixels covered by the filled portion.
pub fn filled_width(w: u32, fraction: f32) -> u32 {
    if fraction.is_nan() {
        return 0;
    }
    (w as f32 * fraction.clamp(0.0, 1.0)).round() as u32
}

/// Signature key for a fill fraction. Exact so that bars of any width
/// redraw on a visible step; values that draw alike at every width
/// (NaN, negatives, -0.0, anything past 1.0) share a key.
pub fn fraction_key(fraction: f32) -> u32 {
    if fraction.is_nan() {
        return 0;
    }
    // `+ 0.0` folds -0.0 into 0.0.
    (fraction.clamp(0.0, 1.0) + 0.0).to_bits()
}
