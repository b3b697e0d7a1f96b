#![forbid(unsafe_code)]

//! Shared colours for the built-in tiles.

use tilecast_raster::PackedRgba;

/// Panel background.
pub const PANEL: PackedRgba = PackedRgba::hex(0x0D0D18);
/// Raised surface on top of a panel.
pub const RAISED: PackedRgba = PackedRgba::hex(0x1A1A2E);
/// Muted foreground for placeholder text bars and empty tracks.
pub const MUTED: PackedRgba = PackedRgba::hex(0x3A3A55);
/// Primary foreground.
pub const TEXT: PackedRgba = PackedRgba::hex(0xE4E4F0);
/// Active / healthy.
pub const ACTIVE: PackedRgba = PackedRgba::hex(0x4ADE80);
/// Idle / waiting.
pub const IDLE: PackedRgba = PackedRgba::hex(0xFBBF24);
/// Error / hot.
pub const ALERT: PackedRgba = PackedRgba::hex(0xF87171);
