#![forbid(unsafe_code)]

//! Card: rounded panel with an accent stripe and placeholder text lines.
//!
//! Line widths are percentages of the content width, so a layout can mimic
//! a text block without shipping glyphs through the raster path.

use tilecast_raster::{PackedRgba, Surface};

use crate::palette;

const RADIUS: f32 = 6.0;
const PAD: u32 = 8;
const STRIPE: u32 = 4;
const LINE_H: u32 = 4;
const LINE_GAP: u32 = 5;

pub fn draw(surface: &mut Surface, w: u32, h: u32, accent: PackedRgba, lines: &[u8]) {
    surface.fill_rounded_rect(0, 0, w, h, RADIUS, palette::RAISED);
    surface.fill_rect(0, RADIUS as i32, STRIPE, h.saturating_sub(2 * RADIUS as u32), accent);

    let left = STRIPE + PAD;
    let content_w = w.saturating_sub(left + PAD);
    let mut y = PAD;
    for (i, pct) in lines.iter().enumerate() {
        if y + LINE_H > h.saturating_sub(PAD / 2) {
            break;
        }
        let line_w = content_w * u32::from((*pct).min(100)) / 100;
        let color = if i == 0 { palette::TEXT } else { palette::MUTED };
        surface.fill_rect(left as i32, y as i32, line_w, LINE_H, color);
        y += LINE_H + LINE_GAP;
    }
}
