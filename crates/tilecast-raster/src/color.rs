#![forbid(unsafe_code)]

//! Packed RGBA colours used by tile surfaces.

/// A compact RGBA color.
///
/// - **Layout:** `0xRRGGBBAA` (R in bits 31..24, A in bits 7..0).
/// - **Alpha:** straight (RGB channels are not pre-multiplied).
///
/// Compositing onto a surface uses Porter-Duff **SourceOver**.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Create an opaque color from a `0xRRGGBB` literal.
    ///
    /// ```
    /// use tilecast_raster::color::PackedRgba;
    ///
    /// assert_eq!(PackedRgba::hex(0x15D1FF), PackedRgba::rgb(0x15, 0xD1, 0xFF));
    /// ```
    #[inline]
    pub const fn hex(rgb: u32) -> Self {
        Self((rgb << 8) | 0xFF)
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    const fn div_round_u8(numer: u64, denom: u64) -> u8 {
        debug_assert!(denom != 0);
        let v = (numer + (denom / 2)) / denom;
        if v > 255 { 255 } else { v as u8 }
    }

    /// Porter-Duff SourceOver: `self over dst`.
    ///
    /// Computed in exact rational form and rounded once at the end.
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        let s_a = self.a() as u64;
        if s_a == 255 {
            return self;
        }
        if s_a == 0 {
            return dst;
        }

        let d_a = dst.a() as u64;
        let inv_s_a = 255 - s_a;
        let numer_a = 255 * s_a + d_a * inv_s_a;
        if numer_a == 0 {
            return Self::TRANSPARENT;
        }

        let out_a = Self::div_round_u8(numer_a, 255);
        let channel = |s: u8, d: u8| {
            Self::div_round_u8(
                (s as u64) * s_a * 255 + (d as u64) * d_a * inv_s_a,
                numer_a,
            )
        };

        Self::rgba(
            channel(self.r(), dst.r()),
            channel(self.g(), dst.g()),
            channel(self.b(), dst.b()),
            out_a,
        )
    }

    /// Scale alpha by an opacity in `[0.0, 1.0]`.
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let a = ((self.a() as f32) * opacity).round().clamp(0.0, 255.0) as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// Linear blend toward `other` by `t` in `[0.0, 1.0]` (all four channels).
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::rgba(
            mix(self.r(), other.r()),
            mix(self.g(), other.g()),
            mix(self.b(), other.b()),
            mix(self.a(), other.a()),
        )
    }

    /// Flatten onto an opaque background, dropping alpha.
    ///
    /// Lossy codecs have no alpha channel, so export surfaces are flattened
    /// with this before encoding.
    #[inline]
    pub fn flatten_onto(self, background: Self) -> [u8; 3] {
        let solid = self.over(Self::rgb(background.r(), background.g(), background.b()));
        [solid.r(), solid.g(), solid.b()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip_through_packing() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
    }

    #[test]
    fn hex_is_opaque() {
        let c = PackedRgba::hex(0x0A0A14);
        assert_eq!(c, PackedRgba::rgb(0x0A, 0x0A, 0x14));
        assert_eq!(c.a(), 255);
    }

    #[test]
    fn over_with_opaque_source_replaces() {
        assert_eq!(PackedRgba::RED.over(PackedRgba::BLUE), PackedRgba::RED);
    }

    #[test]
    fn over_with_transparent_source_keeps_destination() {
        assert_eq!(
            PackedRgba::TRANSPARENT.over(PackedRgba::BLUE),
            PackedRgba::BLUE
        );
    }

    #[test]
    fn over_half_alpha_mixes() {
        let half_white = PackedRgba::rgba(255, 255, 255, 128);
        let out = half_white.over(PackedRgba::BLACK);
        assert_eq!(out.a(), 255);
        assert!(out.r() > 120 && out.r() < 136, "got {}", out.r());
    }

    #[test]
    fn lerp_endpoints() {
        let a = PackedRgba::BLACK;
        let b = PackedRgba::WHITE;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 7.0), b);
    }

    #[test]
    fn flatten_transparent_yields_background() {
        let bg = PackedRgba::hex(0x0D0D18);
        assert_eq!(PackedRgba::TRANSPARENT.flatten_onto(bg), [0x0D, 0x0D, 0x18]);
    }
}
