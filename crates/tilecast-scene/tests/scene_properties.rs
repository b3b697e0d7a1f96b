#![forbid(unsafe_code)]

//! Scene-level behaviour checked against the emitted op and texture streams.
//!
//! Every test drives the scene the way a host loop would (reconcile, then
//! render, then drain) and, where it matters, replays the stream into a
//! `HeadlessDisplay` to confirm the remote ends up mirroring the scene.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use tilecast_proto::{Anomaly, HeadlessDisplay, Layer, OpKind, SceneOp};
use tilecast_raster::{PackedRgba, PngBase64};
use tilecast_scene::{
    GroupDescriptor, QualityTable, RendererRegistry, ResizePolicy, Scene, SceneConfig, Signature,
    TileContent, UnitDescriptor, WorldPosition,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Text,
    Swatch,
    Orphan,
}

#[derive(Debug, Clone, PartialEq)]
enum Tile {
    Text(String),
    Swatch(u32),
    Orphan,
}

impl TileContent for Tile {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        match self {
            Self::Text(_) => Kind::Text,
            Self::Swatch(_) => Kind::Swatch,
            Self::Orphan => Kind::Orphan,
        }
    }

    fn signature(&self) -> Signature {
        match self {
            Self::Text(s) => Signature::of(&(0u8, s)),
            Self::Swatch(c) => Signature::of(&(1u8, c)),
            Self::Orphan => Signature::of(&2u8),
        }
    }
}

fn scene_with(config: SceneConfig, draws: Arc<AtomicUsize>) -> Scene<Tile> {
    let text_draws = draws.clone();
    let registry = RendererRegistry::<Tile>::new()
        .with(Kind::Text, move |s, w, h, d| {
            text_draws.fetch_add(1, Ordering::Relaxed);
            if let Tile::Text(text) = d {
                s.fill_rect(0, 0, w, h, PackedRgba::hex(0x0D0D18));
                s.fill_rect(1, 1, text.len() as u32, h.saturating_sub(2), PackedRgba::WHITE);
            }
        })
        .with(Kind::Swatch, move |s, w, h, d| {
            draws.fetch_add(1, Ordering::Relaxed);
            if let Tile::Swatch(c) = d {
                s.fill_rect(0, 0, w, h, PackedRgba::hex(*c));
            }
        });
    Scene::with_config(registry, QualityTable::new().with(Kind::Swatch, 0.5), config)
        .with_encoder(PngBase64)
}

fn scene() -> Scene<Tile> {
    scene_with(SceneConfig::default(), Arc::new(AtomicUsize::new(0)))
}

fn text(id: &str, label: &str) -> UnitDescriptor<Tile> {
    UnitDescriptor::new(id, 100, 20, Tile::Text(label.into()))
}

fn swatch(id: &str, color: u32) -> UnitDescriptor<Tile> {
    UnitDescriptor::new(id, 8, 8, Tile::Swatch(color))
}

fn tick(scene: &mut Scene<Tile>, units: Vec<UnitDescriptor<Tile>>, groups: Vec<GroupDescriptor>) {
    scene.reconcile(units, groups);
    scene.render_dirty();
}

fn kinds(ops: &[SceneOp]) -> Vec<(OpKind, String)> {
    ops.iter().map(|op| (op.kind(), op.id().to_string())).collect()
}

// ============================================================================
// Concrete scenario
// ============================================================================

#[test]
fn unit_a_lifecycle() {
    let mut scene = scene();

    scene.reconcile([text("a", "hello")], []);
    assert_eq!(scene.render_dirty(), 1);
    let ops = scene.take_ops(10);
    assert_eq!(
        ops,
        vec![SceneOp::Create {
            id: "a".into(),
            x: 0.0,
            y: 0.0,
            z: None,
            w: 100,
            h: 20,
            scale: 1.0,
            layer: Layer::Base,
            group: None,
            interactive: false,
            draggable: false,
        }]
    );
    let textures = scene.take_textures(10);
    assert_eq!(textures.len(), 1);
    assert_eq!((textures[0].id.as_str(), textures[0].w, textures[0].h), ("a", 100, 20));

    scene.reconcile([text("a", "hello")], []);
    assert_eq!(scene.render_dirty(), 0);
    assert!(scene.take_ops(10).is_empty());
    assert!(scene.take_textures(10).is_empty());

    scene.reconcile([text("a", "hello").at(5.0, 0.0)], []);
    scene.render_dirty();
    assert_eq!(
        scene.take_ops(10),
        vec![SceneOp::Move {
            id: "a".into(),
            x: 5.0,
            y: 0.0,
            z: None,
            scale: 1.0,
            layer: Layer::Base,
            group: None,
            duration: 0,
        }]
    );
    assert!(scene.take_textures(10).is_empty());

    scene.reconcile(Vec::<UnitDescriptor<Tile>>::new(), []);
    scene.render_dirty();
    assert_eq!(scene.take_ops(10), vec![SceneOp::Destroy { id: "a".into() }]);
    assert!(scene.is_empty());
}

// ============================================================================
// Reconciliation
// ============================================================================

#[test]
fn reconcile_is_idempotent() {
    let mut scene = scene();
    let units = || vec![text("a", "x"), swatch("b", 0xFF0000).in_group("g").at(3.0, 4.0)];
    let groups = || vec![GroupDescriptor::new("g", 10.0, 20.0)];

    tick(&mut scene, units(), groups());
    assert!(!scene.drain().is_empty());

    tick(&mut scene, units(), groups());
    let second = scene.drain();
    assert!(second.is_empty(), "{second:?}");
}

#[test]
fn reconcile_never_draws() {
    let draws = Arc::new(AtomicUsize::new(0));
    let mut scene = scene_with(SceneConfig::default(), draws.clone());
    scene.reconcile([text("a", "x"), swatch("b", 1)], []);
    assert_eq!(draws.load(Ordering::Relaxed), 0);
    assert_eq!(scene.pending_textures(), 0);
    assert_eq!(scene.pending_ops(), 0);
    assert_eq!(scene.render_dirty(), 2);
    assert_eq!(draws.load(Ordering::Relaxed), 2);
}

#[test]
fn groups_are_reconciled_before_units() {
    let mut scene = scene();
    tick(
        &mut scene,
        vec![swatch("b", 1).in_group("g")],
        vec![GroupDescriptor::new("g", 1.0, 1.0)],
    );
    assert_eq!(
        kinds(&scene.take_ops(10)),
        vec![(OpKind::Group, "g".into()), (OpKind::Create, "b".into())]
    );
}

#[test]
fn unchanged_group_emits_nothing_and_changed_group_moves_with_duration() {
    let mut scene = scene();
    tick(&mut scene, vec![], vec![GroupDescriptor::new("g", 0.0, 0.0)]);
    scene.drain();

    tick(&mut scene, vec![], vec![GroupDescriptor::new("g", 0.0, 0.0).with_duration(300)]);
    assert_eq!(scene.pending_ops(), 0);

    tick(&mut scene, vec![], vec![GroupDescriptor::new("g", 4.0, 0.0).with_duration(300)]);
    assert_eq!(
        scene.take_ops(10),
        vec![SceneOp::GroupMove {
            id: "g".into(),
            x: 4.0,
            y: 0.0,
            z: None,
            visible: true,
            duration: Some(300),
        }]
    );
}

#[test]
fn duplicate_ids_keep_first_occurrence() {
    let mut scene = scene();
    tick(&mut scene, vec![text("a", "first"), text("a", "second").at(9.0, 9.0)], vec![]);
    assert_eq!(scene.len(), 1);
    assert_eq!(scene.unit("a").unwrap().position(), (0.0, 0.0));
    assert_eq!(scene.unit("a").unwrap().data(), &Tile::Text("first".into()));
}

#[test]
fn live_order_follows_desired_order() {
    let mut scene = scene();
    tick(&mut scene, vec![swatch("c", 1), swatch("a", 2), swatch("b", 3)], vec![]);
    let ids: Vec<&str> = scene.units().map(|u| u.id()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
    let ops = scene.take_ops(10);
    assert_eq!(ops.iter().map(SceneOp::id).collect::<Vec<_>>(), vec!["c", "a", "b"]);
}

#[test]
fn reused_id_after_destroy_is_brand_new() {
    let mut scene = scene();
    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    tick(&mut scene, vec![], vec![]);
    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    assert_eq!(
        kinds(&scene.take_ops(10)),
        vec![
            (OpKind::Create, "a".into()),
            (OpKind::Destroy, "a".into()),
            (OpKind::Create, "a".into()),
        ]
    );
    assert_eq!(scene.take_textures(10).len(), 2);
}

#[test]
fn never_created_units_are_removed_silently() {
    let mut scene = scene();
    scene.reconcile([swatch("a", 1)], []);
    scene.reconcile(Vec::<UnitDescriptor<Tile>>::new(), []);
    assert_eq!(scene.render_dirty(), 0);
    assert_eq!(scene.pending_ops(), 0);
}

#[test]
#[should_panic(expected = "changed shape")]
fn resize_panics_by_default() {
    let mut scene = scene();
    scene.reconcile([swatch("a", 1)], []);
    scene.reconcile([UnitDescriptor::new("a", 16, 8, Tile::Swatch(1))], []);
}

#[test]
fn resize_recreates_under_recreate_policy() {
    let config = SceneConfig::default().with_resize_policy(ResizePolicy::Recreate);
    let mut scene = scene_with(config, Arc::new(AtomicUsize::new(0)));
    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    scene.drain();

    tick(&mut scene, vec![UnitDescriptor::new("a", 16, 8, Tile::Swatch(1))], vec![]);
    assert_eq!(
        kinds(&scene.take_ops(10)),
        vec![(OpKind::Destroy, "a".into()), (OpKind::Create, "a".into())]
    );
    assert_eq!(scene.unit("a").unwrap().size(), (16, 8));
    assert_eq!(scene.take_textures(10).len(), 1);
}

// ============================================================================
// Rendering and emission
// ============================================================================

#[test]
fn moving_without_content_change_sends_no_texture() {
    let draws = Arc::new(AtomicUsize::new(0));
    let mut scene = scene_with(SceneConfig::default(), draws.clone());
    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    scene.drain();

    tick(&mut scene, vec![swatch("a", 1).at(7.0, 1.0).on_layer(Layer::Drag)], vec![]);
    let out = scene.drain();
    assert_eq!(kinds(&out.ops), vec![(OpKind::Move, "a".into())]);
    assert!(out.textures.is_empty());
    assert_eq!(draws.load(Ordering::Relaxed), 1);
}

#[test]
fn content_change_without_move_sends_texture_only() {
    let mut scene = scene();
    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    scene.drain();

    tick(&mut scene, vec![swatch("a", 2)], vec![]);
    let out = scene.drain();
    assert!(out.ops.is_empty(), "{:?}", out.ops);
    assert_eq!(out.textures.len(), 1);
}

#[test]
fn content_change_and_move_send_both() {
    let mut scene = scene();
    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    scene.drain();

    tick(&mut scene, vec![swatch("a", 2).at(1.0, 0.0)], vec![]);
    let out = scene.drain();
    assert_eq!(kinds(&out.ops), vec![(OpKind::Move, "a".into())]);
    assert_eq!(out.textures.len(), 1);
}

#[test]
fn missing_renderer_keeps_unit_inert() {
    let mut scene = scene();
    tick(&mut scene, vec![UnitDescriptor::new("o", 4, 4, Tile::Orphan)], vec![]);
    let out = scene.drain();
    assert!(out.is_empty());
    let unit = scene.unit("o").unwrap();
    assert!(unit.is_dirty());
    assert!(!unit.has_renderer());

    scene.resync();
    assert!(scene.drain().is_empty());
}

#[test]
fn hidden_units_are_not_drawn_until_shown() {
    let mut scene = scene();
    tick(&mut scene, vec![swatch("a", 1).visible(false)], vec![]);
    assert!(scene.drain().is_empty());

    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    let out = scene.drain();
    assert_eq!(kinds(&out.ops), vec![(OpKind::Create, "a".into())]);
    assert_eq!(out.textures.len(), 1);
}

#[test]
fn hiding_a_created_unit_sends_visibility() {
    let mut scene = scene();
    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    scene.drain();

    tick(&mut scene, vec![swatch("a", 1).visible(false)], vec![]);
    assert_eq!(
        scene.take_ops(10),
        vec![SceneOp::Visibility {
            id: "a".into(),
            visible: false,
        }]
    );
}

#[test]
fn direct_ops_target_created_units_only() {
    let mut scene = scene();
    scene.reconcile([swatch("a", 1)], []);
    assert!(scene.queue_move("a", 2.0, 3.0, 150));
    assert_eq!(scene.pending_ops(), 0);
    assert!(!scene.queue_move("ghost", 0.0, 0.0, 0));
    assert!(!scene.queue_visibility("ghost", false));

    scene.render_dirty();
    match &scene.take_ops(10)[..] {
        [SceneOp::Create { x, y, .. }] => assert_eq!((*x, *y), (2.0, 3.0)),
        other => panic!("unexpected {other:?}"),
    }

    assert!(scene.queue_move("a", 4.0, 3.0, 150));
    assert!(scene.queue_visibility("a", false));
    let ops = scene.take_ops(10);
    assert!(matches!(ops[0], SceneOp::Move { duration: 150, .. }));
    assert_eq!(
        ops[1],
        SceneOp::Visibility {
            id: "a".into(),
            visible: false,
        }
    );
    scene.render_dirty();
    assert_eq!(scene.pending_ops(), 0);
}

#[test]
fn move_coalescing_merges_pending_moves() {
    let config = SceneConfig::default().with_coalesce_moves(true);
    let mut scene = scene_with(config, Arc::new(AtomicUsize::new(0)));
    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    scene.drain();

    for x in 1..=5 {
        tick(&mut scene, vec![swatch("a", 1).at(x as f32, 0.0)], vec![]);
    }
    match &scene.take_ops(10)[..] {
        [SceneOp::Move { x, .. }] => assert_eq!(*x, 5.0),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn default_quality_is_point_six() {
    let scene = scene();
    assert_eq!(scene.config().default_quality.value(), 0.6);
}

// ============================================================================
// World position
// ============================================================================

#[test]
fn world_position_composes_group_offset() {
    let mut scene = scene();
    scene.reconcile(
        [swatch("a", 1).in_group("g").at(3.0, 4.0)],
        [GroupDescriptor::new("g", 10.0, 20.0).with_z(0.5)],
    );
    assert_eq!(
        scene.world_position("a"),
        Some(WorldPosition {
            x: 13.0,
            y: 24.0,
            z: Some(0.5),
        })
    );
}

#[test]
fn explicit_z_overrides_group_depth() {
    let mut scene = scene();
    scene.reconcile(
        [swatch("a", 1).in_group("g").with_z(2.0)],
        [GroupDescriptor::new("g", 0.0, 0.0).with_z(0.5)],
    );
    assert_eq!(scene.world_position("a").unwrap().z, Some(2.0));
}

#[test]
fn world_position_unknown_or_ungrouped() {
    let mut scene = scene();
    scene.reconcile([swatch("a", 1).at(3.0, 4.0), swatch("b", 1).in_group("nowhere")], []);
    assert_eq!(scene.world_position("missing"), None);
    assert_eq!(
        scene.world_position("a"),
        Some(WorldPosition {
            x: 3.0,
            y: 4.0,
            z: None,
        })
    );
    assert_eq!(scene.world_position("b").unwrap().x, 0.0);
}

// ============================================================================
// Resync, clear, draining
// ============================================================================

#[test]
fn resync_re_emits_everything_visible() {
    let mut scene = scene();
    tick(
        &mut scene,
        vec![
            swatch("a", 1).in_group("g"),
            swatch("b", 2).visible(false),
            text("c", "hi"),
        ],
        vec![GroupDescriptor::new("g", 1.0, 2.0), GroupDescriptor::new("h", 0.0, 0.0)],
    );
    scene.drain();

    scene.resync();
    let out = scene.drain();
    assert_eq!(
        kinds(&out.ops),
        vec![
            (OpKind::Group, "g".into()),
            (OpKind::Group, "h".into()),
            (OpKind::Create, "a".into()),
            (OpKind::Create, "c".into()),
        ]
    );
    let tex_ids: Vec<&str> = out.textures.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(tex_ids, vec!["a", "c"]);
}

#[test]
fn resync_covers_units_never_rendered() {
    let mut scene = scene();
    scene.reconcile([swatch("a", 1)], []);
    scene.resync();
    let out = scene.drain();
    assert_eq!(kinds(&out.ops), vec![(OpKind::Create, "a".into())]);
    assert_eq!(out.textures.len(), 1);
    assert!(scene.unit("a").unwrap().is_created());

    assert_eq!(scene.render_dirty(), 0);
    assert!(scene.drain().is_empty());
}

#[test]
fn resync_leaves_pending_moves_alone() {
    let mut scene = scene();
    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    scene.drain();
    scene.reconcile([swatch("a", 1).at(5.0, 0.0)], []);
    scene.resync();
    scene.drain();
    assert!(scene.unit("a").unwrap().is_position_dirty());
    scene.render_dirty();
    assert_eq!(kinds(&scene.take_ops(10)), vec![(OpKind::Move, "a".into())]);
}

#[test]
fn clear_destroys_created_units_and_all_groups() {
    let mut scene = scene();
    tick(
        &mut scene,
        vec![swatch("a", 1), swatch("b", 2), swatch("hidden", 3).visible(false)],
        vec![GroupDescriptor::new("g", 0.0, 0.0)],
    );
    scene.drain();

    scene.clear();
    assert_eq!(
        kinds(&scene.take_ops(10)),
        vec![
            (OpKind::Destroy, "a".into()),
            (OpKind::Destroy, "b".into()),
            (OpKind::GroupDestroy, "g".into()),
        ]
    );
    assert_eq!(scene.len(), 0);
    assert_eq!(scene.group_count(), 0);
}

#[test]
fn empty_drains_return_empty() {
    let mut scene = scene();
    assert!(scene.take_ops(0).is_empty());
    assert!(scene.take_ops(5).is_empty());
    assert!(scene.take_textures(5).is_empty());
    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    assert!(scene.take_ops(0).is_empty());
    assert_eq!(scene.pending_ops(), 1);
}

// ============================================================================
// Remote mirror
// ============================================================================

#[test]
fn group_destroy_recreates_surviving_children() {
    let mut scene = scene();
    let mut display = HeadlessDisplay::new();

    tick(
        &mut scene,
        vec![swatch("a", 1).in_group("g").at(3.0, 4.0)],
        vec![GroupDescriptor::new("g", 10.0, 20.0)],
    );
    let out = scene.drain();
    display.apply_ops(&out.ops);
    out.textures.iter().for_each(|t| display.apply_texture(t));
    assert!(display.is_shown("a"));

    // Group goes away but the unit stays, now ungrouped.
    let signature_before = scene.unit("a").unwrap().signature();
    tick(&mut scene, vec![swatch("a", 1).at(3.0, 4.0)], vec![]);
    let out = scene.drain();
    assert_eq!(
        kinds(&out.ops),
        vec![(OpKind::GroupDestroy, "g".into()), (OpKind::Create, "a".into())]
    );
    assert_eq!(out.textures.len(), 1);
    assert_eq!(scene.unit("a").unwrap().signature(), signature_before);

    display.apply_ops(&out.ops);
    out.textures.iter().for_each(|t| display.apply_texture(t));
    assert!(display.is_shown("a"));
    assert_eq!(display.world_position("a"), Some((3.0, 4.0, None)));
    assert!(display.anomalies().is_empty(), "{:?}", display.anomalies());
}

#[test]
fn late_joiner_mirrors_scene_after_resync() {
    let mut scene = scene();
    tick(
        &mut scene,
        vec![swatch("a", 1).in_group("g").at(3.0, 4.0), text("b", "x")],
        vec![GroupDescriptor::new("g", 10.0, 20.0)],
    );
    scene.drain();

    let mut late = HeadlessDisplay::new();
    scene.resync();
    let out = scene.drain();
    late.apply_ops(&out.ops);
    out.textures.iter().for_each(|t| late.apply_texture(t));

    assert_eq!(late.quad_ids(), vec!["a", "b"]);
    assert_eq!(late.world_position("a"), Some((13.0, 24.0, None)));
    assert!(late.is_shown("b"));
    assert!(late.anomalies().is_empty());
}

#[test]
fn resync_duplicates_are_tolerated_by_existing_subscribers() {
    let mut scene = scene();
    let mut display = HeadlessDisplay::new();
    tick(&mut scene, vec![swatch("a", 1)], vec![]);
    let out = scene.drain();
    display.apply_ops(&out.ops);
    out.textures.iter().for_each(|t| display.apply_texture(t));

    scene.resync();
    let out = scene.drain();
    display.apply_ops(&out.ops);
    out.textures.iter().for_each(|t| display.apply_texture(t));

    assert_eq!(display.quad_count(), 1);
    assert_eq!(
        display.anomalies(),
        &[Anomaly::DuplicateCreate { id: "a".into() }]
    );
}
