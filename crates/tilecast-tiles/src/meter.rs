#![forbid(unsafe_code)]

//! Level meter: a row of vertical bars, lit up to `level`.

use tilecast_raster::{PackedRgba, Surface};

use crate::palette;

const GAP: u32 = 2;

/// Bars actually drawn; a meter always shows at least one.
pub fn bar_count(bars: u8) -> u8 {
    bars.max(1)
}

/// Number of lit bars for a level in `[0.0, 1.0]`.
pub fn lit_bars(bars: u8, level: f32) -> u8 {
    if level.is_nan() {
        return 0;
    }
    (f32::from(bar_count(bars)) * level.clamp(0.0, 1.0)).ceil() as u8
}

pub fn draw(surface: &mut Surface, w: u32, h: u32, level: f32, bars: u8, color: PackedRgba) {
    surface.fill_rect(0, 0, w, h, palette::PANEL);
    let lit = u32::from(lit_bars(bars, level));
    let bars = u32::from(bar_count(bars));
    let bar_w = (w.saturating_sub(GAP * (bars + 1)) / bars).max(1);
    for i in 0..bars {
        // Bars grow in height left to right.
        let bar_h = (h.saturating_sub(2 * GAP) * (i + 1) / bars).max(1);
        let x = GAP + i * (bar_w + GAP);
        let y = h.saturating_sub(GAP + bar_h);
        let fill = if i < lit { color } else { palette::MUTED };
        surface.fill_rect(x as i32, y as i32, bar_w, bar_h, fill);
    }
}
