#![forbid(unsafe_code)]

//! Built-in tiles driven through a real scene with the default JPEG codec.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tilecast_proto::{OpKind, SceneOp};
use tilecast_raster::Surface;
use tilecast_scene::{GroupDescriptor, Scene, TileContent, UnitDescriptor};
use tilecast_tiles::{Tile, TileKind, palette};

fn hud(level: f32, progress: f32) -> Vec<UnitDescriptor<Tile>> {
    vec![
        UnitDescriptor::new("bg", 200, 80, Tile::Fill { color: palette::PANEL, radius: 8 }).in_group("hud"),
        UnitDescriptor::new("status", 16, 16, Tile::Dot { color: palette::ACTIVE, glow: true })
            .in_group("hud")
            .at(8.0, 8.0),
        UnitDescriptor::new("card", 160, 48, Tile::Card { accent: palette::IDLE, lines: vec![90, 60] })
            .in_group("hud")
            .at(30.0, 4.0),
        UnitDescriptor::new("bar", 160, 6, Tile::Progress { fraction: progress, color: palette::ACTIVE })
            .in_group("hud")
            .at(30.0, 60.0),
        UnitDescriptor::new("mic", 30, 20, Tile::Meter { level, bars: 4, color: palette::ALERT })
            .in_group("hud")
            .at(160.0, 56.0),
    ]
}

fn scene() -> Scene<Tile> {
    Scene::new(tilecast_tiles::registry(), tilecast_tiles::quality_table())
}

#[test]
fn hud_renders_every_kind_as_jpeg() {
    let mut scene = scene();
    scene.reconcile(hud(0.3, 0.25), [GroupDescriptor::new("hud", -0.5, 0.2)]);
    assert_eq!(scene.render_dirty(), 5);

    let out = scene.drain();
    assert_eq!(out.ops.len(), 6);
    assert_eq!(out.ops[0].kind(), OpKind::Group);
    assert!(out.ops[1..].iter().all(|op| op.kind() == OpKind::Create));
    assert_eq!(out.textures.len(), 5);
    for tex in &out.textures {
        let bytes = tex.image.decode().unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "{} is not a JPEG", tex.id);
    }
}

#[test]
fn meter_jitter_within_a_bar_is_free() {
    let mut scene = scene();
    scene.reconcile(hud(0.30, 0.25), [GroupDescriptor::new("hud", 0.0, 0.0)]);
    scene.render_dirty();
    scene.drain();

    scene.reconcile(hud(0.31, 0.25), [GroupDescriptor::new("hud", 0.0, 0.0)]);
    assert_eq!(scene.render_dirty(), 0);
    assert!(scene.drain().is_empty());

    scene.reconcile(hud(0.9, 0.25), [GroupDescriptor::new("hud", 0.0, 0.0)]);
    assert_eq!(scene.render_dirty(), 1);
    let out = scene.drain();
    assert!(out.ops.is_empty());
    assert_eq!(out.textures.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["mic"]);
}

#[test]
fn moving_the_group_moves_no_pixels() {
    let mut scene = scene();
    scene.reconcile(hud(0.3, 0.5), [GroupDescriptor::new("hud", 0.0, 0.0)]);
    scene.render_dirty();
    scene.drain();

    scene.reconcile(hud(0.3, 0.5), [GroupDescriptor::new("hud", 1.0, 0.0).with_duration(200)]);
    assert_eq!(scene.render_dirty(), 0);
    let out = scene.drain();
    assert_eq!(
        out.ops,
        vec![SceneOp::GroupMove {
            id: "hud".into(),
            x: 1.0,
            y: 0.0,
            z: None,
            visible: true,
            duration: Some(200),
        }]
    );
    assert!(out.textures.is_empty());
    assert_eq!(scene.world_position("status").map(|p| (p.x, p.y)), Some((9.0, 8.0)));
}

fn pixels(tile: &Tile, w: u32, h: u32) -> Vec<tilecast_raster::PackedRgba> {
    let registry = tilecast_tiles::registry();
    let draw = registry.get(tile.kind()).unwrap();
    let mut surface = Surface::new(w, h);
    draw(&mut surface, w, h, tile);
    surface.pixels().to_vec()
}

#[test]
fn zero_bar_meter_redraws_on_level_change() {
    let quiet = Tile::Meter { level: 0.0, bars: 0, color: palette::ALERT };
    let loud = Tile::Meter { level: 1.0, bars: 0, color: palette::ALERT };
    assert_ne!(pixels(&quiet, 30, 20), pixels(&loud, 30, 20));
    assert_ne!(quiet.signature(), loud.signature());

    let one_bar = Tile::Meter { level: 1.0, bars: 1, color: palette::ALERT };
    assert_eq!(loud.signature(), one_bar.signature());
}

#[test]
fn wide_progress_bar_redraws_on_small_steps() {
    let mut scene = scene();
    let bar = |fraction| {
        [UnitDescriptor::new("bar", 2000, 8, Tile::Progress { fraction, color: palette::ACTIVE })]
    };
    scene.reconcile(bar(0.5), []);
    scene.render_dirty();
    scene.drain();

    scene.reconcile(bar(0.5004), []);
    assert_eq!(scene.render_dirty(), 1);
    let out = scene.drain();
    assert_eq!(out.textures.len(), 1);
}

fn tile_strategy() -> impl Strategy<Value = Tile> {
    let color = any::<u32>().prop_map(tilecast_raster::PackedRgba);
    prop_oneof![
        (color.clone(), any::<u8>()).prop_map(|(color, radius)| Tile::Fill { color, radius }),
        (color.clone(), any::<bool>()).prop_map(|(color, glow)| Tile::Dot { color, glow }),
        (color.clone(), prop::collection::vec(any::<u8>(), 0..12))
            .prop_map(|(accent, lines)| Tile::Card { accent, lines }),
        (any::<f32>(), color.clone()).prop_map(|(fraction, color)| Tile::Progress { fraction, color }),
        (any::<f32>(), any::<u8>(), color).prop_map(|(level, bars, color)| Tile::Meter { level, bars, color }),
    ]
}

proptest! {
    #[test]
    fn draw_functions_never_panic(tile in tile_strategy(), w in 0u32..64, h in 0u32..64) {
        let registry = tilecast_tiles::registry();
        let draw = registry.get(tile.kind()).unwrap();
        let mut surface = Surface::new(w, h);
        draw(&mut surface, w, h, &tile);
        prop_assert_eq!(surface.size(), (w, h));
    }

    #[test]
    fn meter_pixel_changes_change_the_signature(
        a in (any::<f32>(), 0u8..12),
        b in (any::<f32>(), 0u8..12),
        w in 1u32..64,
        h in 1u32..32,
    ) {
        let a = Tile::Meter { level: a.0, bars: a.1, color: palette::ALERT };
        let b = Tile::Meter { level: b.0, bars: b.1, color: palette::ALERT };
        if pixels(&a, w, h) != pixels(&b, w, h) {
            prop_assert_ne!(a.signature(), b.signature());
        }
    }

    #[test]
    fn progress_pixel_changes_change_the_signature(
        a in -0.5f32..1.5,
        b in -0.5f32..1.5,
        w in 1u32..2500,
    ) {
        let a = Tile::Progress { fraction: a, color: palette::ACTIVE };
        let b = Tile::Progress { fraction: b, color: palette::ACTIVE };
        if pixels(&a, w, 4) != pixels(&b, w, 4) {
            prop_assert_ne!(a.signature(), b.signature());
        }
    }

    #[test]
    fn equal_tiles_share_a_signature(tile in tile_strategy()) {
        prop_assert_eq!(tile.clone().signature(), tile.signature());
        prop_assert!(TileKind::ALL.contains(&tile.kind()));
    }
}
