#![forbid(unsafe_code)]

//! Built-in tile kinds for tilecast.
//!
//! [`Tile`] is a closed set of payloads, each drawn by a pure function in its
//! own module. Use [`registry`] and [`quality_table`] to build a scene that
//! knows all of them:
//!
//! ```
//! use tilecast_scene::{Scene, UnitDescriptor};
//! use tilecast_tiles::{Tile, palette};
//!
//! let mut scene = Scene::new(tilecast_tiles::registry(), tilecast_tiles::quality_table());
//! scene.reconcile(
//!     [UnitDescriptor::new("status", 16, 16, Tile::Dot { color: palette::ACTIVE, glow: true })],
//!     [],
//! );
//! assert_eq!(scene.render_dirty(), 1);
//! ```

pub mod card;
pub mod dot;
pub mod fill;
pub mod meter;
pub mod palette;
pub mod progress;

use std::hash::{Hash, Hasher};

use tilecast_raster::PackedRgba;
use tilecast_scene::{QualityTable, RendererRegistry, Signature, TileContent};

/// Discriminant of [`Tile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Fill,
    Dot,
    Card,
    Progress,
    Meter,
}

impl TileKind {
    pub const ALL: [Self; 5] = [Self::Fill, Self::Dot, Self::Card, Self::Progress, Self::Meter];
}

/// Payload for one built-in tile.
#[derive(Debug, Clone, PartialEq)]
pub enum Tile {
    /// Solid colour block, e.g. a panel background.
    Fill { color: PackedRgba, radius: u8 },
    /// Status dot.
    Dot { color: PackedRgba, glow: bool },
    /// Panel with an accent stripe and placeholder text lines (width
    /// percentages).
    Card { accent: PackedRgba, lines: Vec<u8> },
    /// Progress bar.
    Progress { fraction: f32, color: PackedRgba },
    /// Bar meter, e.g. microphone level.
    Meter { level: f32, bars: u8, color: PackedRgba },
}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Fill { color, radius } => {
                color.hash(state);
                radius.hash(state);
            }
            Self::Dot { color, glow } => {
                color.hash(state);
                glow.hash(state);
            }
            Self::Card { accent, lines } => {
                accent.hash(state);
                lines.hash(state);
            }
            Self::Progress { fraction, color } => {
                // Hash what is drawn, not the raw float.
                progress::fraction_key(*fraction).hash(state);
                color.hash(state);
            }
            Self::Meter { level, bars, color } => {
                meter::lit_bars(*bars, *level).hash(state);
                meter::bar_count(*bars).hash(state);
                color.hash(state);
            }
        }
    }
}

impl TileContent for Tile {
    type Kind = TileKind;

    fn kind(&self) -> TileKind {
        match self {
            Self::Fill { .. } => TileKind::Fill,
            Self::Dot { .. } => TileKind::Dot,
            Self::Card { .. } => TileKind::Card,
            Self::Progress { .. } => TileKind::Progress,
            Self::Meter { .. } => TileKind::Meter,
        }
    }

    fn signature(&self) -> Signature {
        Signature::of(self)
    }
}

/// Registry with a draw function for every [`TileKind`].
pub fn registry() -> RendererRegistry<Tile> {
    RendererRegistry::<Tile>::new()
        .with(TileKind::Fill, |s, w, h, tile| {
            if let Tile::Fill { color, radius } = tile {
                fill::draw(s, w, h, *color, *radius);
            }
        })
        .with(TileKind::Dot, |s, w, h, tile| {
            if let Tile::Dot { color, glow } = tile {
                dot::draw(s, w, h, *color, *glow);
            }
        })
        .with(TileKind::Card, |s, w, h, tile| {
            if let Tile::Card { accent, lines } = tile {
                card::draw(s, w, h, *accent, lines);
            }
        })
        .with(TileKind::Progress, |s, w, h, tile| {
            if let Tile::Progress { fraction, color } = tile {
                progress::draw(s, w, h, *fraction, *color);
            }
        })
        .with(TileKind::Meter, |s, w, h, tile| {
            if let Tile::Meter { level, bars, color } = tile {
                meter::draw(s, w, h, *level, *bars, *color);
            }
        })
}

/// Per-kind encode quality. Flat content tolerates lower fidelity.
pub fn quality_table() -> QualityTable<TileKind> {
    QualityTable::new()
        .with(TileKind::Fill, 0.5)
        .with(TileKind::Dot, 0.55)
        .with(TileKind::Card, 0.55)
        .with(TileKind::Progress, 0.55)
        .with(TileKind::Meter, 0.5)
}
