#![forbid(unsafe_code)]

//! The retained scene.
//!
//! Each tick the caller hands [`Scene::reconcile`] the full desired list of
//! units and groups, then calls [`Scene::render_dirty`] and drains the op and
//! texture queues at whatever rate the channel allows:
//!
//! ```text
//! layout ──► reconcile ──► render_dirty ──► take_ops / take_textures ──► channel
//! ```
//!
//! Reconciliation only diffs and queues topology; it never draws or
//! encodes. Drawing happens in `render_dirty` and only for units whose
//! content signature changed, so moving an unchanged tile costs a single
//! `move` op and no texture.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use tilecast_proto::{SceneOp, TexPayload};
use tilecast_raster::{BitmapEncoder, JpegBase64, PackedRgba, Quality, SurfacePool};
use tracing::{debug, debug_span, trace, warn};

use crate::config::{ResizePolicy, SceneConfig};
use crate::content::TileContent;
use crate::descriptor::{GroupDescriptor, UnitDescriptor};
use crate::group::Group;
use crate::quality::QualityTable;
use crate::queue::{BroadcastQueue, OpQueue};
use crate::registry::RendererRegistry;
use crate::unit::Unit;

/// Composed world-space position of a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
    pub z: Option<f32>,
}

/// Retained set of units and groups plus the pending outbound queues.
pub struct Scene<D: TileContent> {
    units: HashMap<String, Unit<D>>,
    order: Vec<String>,
    groups: HashMap<String, Group>,
    group_order: Vec<String>,
    registry: RendererRegistry<D>,
    qualities: QualityTable<D::Kind>,
    config: SceneConfig,
    pool: SurfacePool,
    encoder: Box<dyn BitmapEncoder>,
    ops: OpQueue,
    textures: VecDeque<TexPayload>,
}

impl<D: TileContent> Scene<D> {
    /// Scene with the default config and JPEG encoding.
    pub fn new(registry: RendererRegistry<D>, qualities: QualityTable<D::Kind>) -> Self {
        Self::with_config(registry, qualities, SceneConfig::default())
    }

    pub fn with_config(
        registry: RendererRegistry<D>,
        qualities: QualityTable<D::Kind>,
        config: SceneConfig,
    ) -> Self {
        Self {
            units: HashMap::new(),
            order: Vec::new(),
            groups: HashMap::new(),
            group_order: Vec::new(),
            registry,
            qualities,
            ops: OpQueue::new(config.coalesce_moves),
            config,
            pool: SurfacePool::new(),
            encoder: Box::new(JpegBase64),
            textures: VecDeque::new(),
        }
    }

    /// Swap the bitmap codec.
    #[must_use]
    pub fn with_encoder(mut self, encoder: impl BitmapEncoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn registry(&self) -> &RendererRegistry<D> {
        &self.registry
    }

    /// Export surfaces allocated so far, one per distinct `(w, h)`.
    pub fn pool(&self) -> &SurfacePool {
        &self.pool
    }

    // ---------------------------------------------------------------------
    // Reconciliation
    // ---------------------------------------------------------------------

    /// Diff the desired scene against live state and queue topology ops.
    ///
    /// Groups are reconciled first so units can reference them. Live order
    /// follows the desired order; duplicate ids keep their first occurrence.
    ///
    /// # Panics
    ///
    /// Under [`ResizePolicy::Panic`], if a descriptor changes the size or
    /// kind of a live unit.
    pub fn reconcile<U, G>(&mut self, units: U, groups: G)
    where
        U: IntoIterator<Item = UnitDescriptor<D>>,
        G: IntoIterator<Item = GroupDescriptor>,
    {
        let units: Vec<UnitDescriptor<D>> = units.into_iter().collect();
        let groups: Vec<GroupDescriptor> = groups.into_iter().collect();
        let _span = debug_span!("reconcile", units = units.len(), groups = groups.len()).entered();

        self.reconcile_groups(groups);
        self.reconcile_units(units);
    }

    fn reconcile_groups(&mut self, desired: Vec<GroupDescriptor>) {
        let mut seen = HashSet::with_capacity(desired.len());
        let desired: Vec<GroupDescriptor> = desired
            .into_iter()
            .filter(|g| {
                let fresh = seen.insert(g.id.clone());
                if !fresh {
                    warn!(id = %g.id, "duplicate group id in desired list; keeping first");
                }
                fresh
            })
            .collect();

        let old_order = std::mem::take(&mut self.group_order);
        for id in old_order {
            if seen.contains(&id) {
                continue;
            }
            self.groups.remove(&id);
            self.ops.push(SceneOp::GroupDestroy { id: id.clone() });
            self.forget_children(&id);
            debug!(id = %id, "group destroyed");
        }

        for desc in desired {
            match self.groups.get_mut(&desc.id) {
                Some(group) => {
                    if group.apply(&desc) {
                        self.ops.push(group.move_op());
                    }
                }
                None => {
                    let group = Group::new(&desc);
                    self.ops.push(group.create_op());
                    self.groups.insert(desc.id.clone(), group);
                    debug!(id = %desc.id, "group created");
                }
            }
            self.group_order.push(desc.id);
        }
    }

    /// The remote destroys children along with their group; anything it had
    /// parented under `group` must be created again.
    fn forget_children(&mut self, group: &str) {
        for unit in self.units.values_mut() {
            if unit.is_created() && unit.sent_group() == Some(group) {
                trace!(id = unit.id(), group, "unit lost with its group");
                unit.forget_remote();
            }
        }
    }

    fn reconcile_units(&mut self, desired: Vec<UnitDescriptor<D>>) {
        let mut seen = HashSet::with_capacity(desired.len());
        let desired: Vec<UnitDescriptor<D>> = desired
            .into_iter()
            .filter(|u| {
                let fresh = seen.insert(u.id.clone());
                if !fresh {
                    warn!(id = %u.id, "duplicate unit id in desired list; keeping first");
                }
                fresh
            })
            .collect();

        let old_order = std::mem::take(&mut self.order);
        for id in old_order {
            if seen.contains(&id) {
                continue;
            }
            if let Some(unit) = self.units.remove(&id) {
                if unit.is_created() {
                    self.ops.push(SceneOp::Destroy { id: id.clone() });
                }
                debug!(id = %id, "unit removed");
            }
        }

        for desc in desired {
            let id = desc.id.clone();
            let mismatch = self
                .units
                .get(&id)
                .map(|unit| unit.size() != (desc.w, desc.h) || unit.kind() != desc.kind());
            match mismatch {
                Some(false) => {
                    if let Some(unit) = self.units.get_mut(&id) {
                        unit.apply_descriptor(&desc);
                        unit.set_data(desc.data);
                    }
                }
                Some(true) => {
                    let old = self.units.get(&id).map(|u| (u.size(), u.kind()));
                    match self.config.resize_policy {
                        ResizePolicy::Panic => panic!(
                            "unit {id:?} changed shape {:?} -> ({:?}, {:?}); units keep their size and kind for life",
                            old,
                            (desc.w, desc.h),
                            desc.kind()
                        ),
                        ResizePolicy::Recreate => {
                            if let Some(unit) = self.units.remove(&id) {
                                if unit.is_created() {
                                    self.ops.push(SceneOp::Destroy { id: id.clone() });
                                }
                            }
                            debug!(id = %id, "unit recreated after shape change");
                            let unit = self.construct(desc);
                            self.units.insert(id.clone(), unit);
                        }
                    }
                }
                None => {
                    let unit = self.construct(desc);
                    self.units.insert(id.clone(), unit);
                }
            }
            self.order.push(id);
        }
    }

    fn construct(&self, desc: UnitDescriptor<D>) -> Unit<D> {
        let kind = desc.kind();
        let renderer = self.registry.get(kind);
        if renderer.is_none() {
            warn!(id = %desc.id, kind = ?kind, "no renderer registered; unit will stay inert");
        }
        Unit::new(desc, renderer)
    }

    // ---------------------------------------------------------------------
    // Rendering and emission
    // ---------------------------------------------------------------------

    /// Redraw dirty visible units, queue their textures, and queue any
    /// pending `create` / `visibility` / `move` ops. Returns how many units
    /// were drawn.
    pub fn render_dirty(&mut self) -> usize {
        let _span = debug_span!("render_dirty", units = self.order.len()).entered();
        let mut drawn = 0;

        for id in &self.order {
            let Some(unit) = self.units.get_mut(id) else {
                continue;
            };

            let mut rendered = false;
            if unit.is_visible() {
                rendered = unit.render();
                if rendered {
                    drawn += 1;
                    self.textures.extend(export_texture(
                        unit,
                        &mut self.pool,
                        self.encoder.as_mut(),
                        &self.qualities,
                        &self.config,
                    ));
                }
                if !unit.is_created() && unit.has_content() {
                    self.ops.push(unit.create_op());
                    unit.mark_created();
                    if !rendered {
                        self.textures.extend(export_texture(
                            unit,
                            &mut self.pool,
                            self.encoder.as_mut(),
                            &self.qualities,
                            &self.config,
                        ));
                    }
                }
            }

            if unit.is_created() {
                if unit.take_visibility_dirty() {
                    self.ops.push(SceneOp::Visibility {
                        id: id.clone(),
                        visible: unit.is_visible(),
                    });
                }
                if unit.is_position_dirty() {
                    self.ops.push(unit.move_op(0));
                    unit.mark_moved();
                }
            }
        }

        trace!(drawn, "render_dirty done");
        drawn
    }

    /// Queue a full snapshot for a subscriber that joined late.
    ///
    /// Every live group gets a `group` op; every visible unit with a
    /// renderer gets a `create` and its texture, drawing first if it never
    /// has. Receivers treat `create` on a known id as an update.
    pub fn resync(&mut self) {
        let _span = debug_span!("resync", units = self.order.len(), groups = self.group_order.len()).entered();

        for id in &self.group_order {
            if let Some(group) = self.groups.get(id) {
                self.ops.push(group.create_op());
            }
        }

        for id in &self.order {
            let Some(unit) = self.units.get_mut(id) else {
                continue;
            };
            if !unit.is_visible() || !unit.has_renderer() {
                continue;
            }
            unit.render();
            self.ops.push(unit.create_op());
            if !unit.is_created() {
                unit.mark_created();
            }
            self.textures.extend(export_texture(
                unit,
                &mut self.pool,
                self.encoder.as_mut(),
                &self.qualities,
                &self.config,
            ));
        }
    }

    /// Tear down everything: `destroy` for each created unit, then
    /// `group-destroy` for each group. Pending queues are kept.
    pub fn clear(&mut self) {
        let _span = debug_span!("clear", units = self.order.len(), groups = self.group_order.len()).entered();

        for id in std::mem::take(&mut self.order) {
            if let Some(unit) = self.units.remove(&id) {
                if unit.is_created() {
                    self.ops.push(SceneOp::Destroy { id });
                }
            }
        }
        for id in std::mem::take(&mut self.group_order) {
            self.groups.remove(&id);
            self.ops.push(SceneOp::GroupDestroy { id });
        }
        self.units.clear();
        self.groups.clear();
    }

    // ---------------------------------------------------------------------
    // Direct ops
    // ---------------------------------------------------------------------

    /// Move a unit outside the layout pass (hover nudges, drag ghosts).
    ///
    /// The next `reconcile` restores whatever the layout says. Returns false
    /// for unknown ids.
    pub fn queue_move(&mut self, id: &str, x: f32, y: f32, duration: u32) -> bool {
        let Some(unit) = self.units.get_mut(id) else {
            return false;
        };
        unit.set_local_position(x, y);
        if unit.is_created() {
            self.ops.push(unit.move_op(duration));
            unit.mark_moved();
        }
        true
    }

    /// Show or hide a unit outside the layout pass. Returns false for
    /// unknown ids.
    pub fn queue_visibility(&mut self, id: &str, visible: bool) -> bool {
        let Some(unit) = self.units.get_mut(id) else {
            return false;
        };
        unit.set_visible(visible);
        if unit.is_created() {
            unit.take_visibility_dirty();
            self.ops.push(SceneOp::Visibility {
                id: id.to_string(),
                visible,
            });
        }
        true
    }

    // ---------------------------------------------------------------------
    // Queues
    // ---------------------------------------------------------------------

    /// Pop up to `n` ops in FIFO order.
    pub fn take_ops(&mut self, n: usize) -> Vec<SceneOp> {
        self.ops.take(n)
    }

    /// Pop up to `n` textures in FIFO order.
    pub fn take_textures(&mut self, n: usize) -> Vec<TexPayload> {
        let n = n.min(self.textures.len());
        self.textures.drain(..n).collect()
    }

    /// Take everything pending.
    pub fn drain(&mut self) -> BroadcastQueue {
        BroadcastQueue {
            ops: self.ops.take(usize::MAX),
            textures: self.textures.drain(..).collect(),
        }
    }

    pub fn pending_ops(&self) -> usize {
        self.ops.len()
    }

    pub fn pending_textures(&self) -> usize {
        self.textures.len()
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    /// Unit position composed with its live group. `None` for unknown ids.
    pub fn world_position(&self, id: &str) -> Option<WorldPosition> {
        let unit = self.units.get(id)?;
        let (x, y) = unit.position();
        let group = unit.group().and_then(|g| self.groups.get(g));
        Some(match group {
            Some(group) => {
                let (gx, gy) = group.position();
                WorldPosition {
                    x: gx + x,
                    y: gy + y,
                    z: unit.z().or(group.z()),
                }
            }
            None => WorldPosition { x, y, z: unit.z() },
        })
    }

    pub fn unit(&self, id: &str) -> Option<&Unit<D>> {
        self.units.get(id)
    }

    /// Mutable access for manual signature updates.
    pub fn unit_mut(&mut self, id: &str) -> Option<&mut Unit<D>> {
        self.units.get_mut(id)
    }

    /// Live units in desired-list order.
    pub fn units(&self) -> impl Iterator<Item = &Unit<D>> {
        self.order.iter().filter_map(|id| self.units.get(id))
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Live groups in desired-list order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.group_order.iter().filter_map(|id| self.groups.get(id))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

fn export_texture<D: TileContent>(
    unit: &mut Unit<D>,
    pool: &mut SurfacePool,
    encoder: &mut dyn BitmapEncoder,
    qualities: &QualityTable<D::Kind>,
    config: &SceneConfig,
) -> Option<TexPayload> {
    let quality: Quality = qualities.resolve(unit.kind(), config.default_quality);
    let background: PackedRgba = config.export_background;
    match unit.encoded_bitmap(pool, encoder, quality, background) {
        Ok(image) => {
            let (w, h) = unit.size();
            Some(TexPayload::new(unit.id(), image, w, h))
        }
        Err(err) => {
            warn!(id = unit.id(), codec = encoder.name(), error = %err, "texture encode failed; skipping");
            None
        }
    }
}

impl<D: TileContent> fmt::Debug for Scene<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("units", &self.order)
            .field("groups", &self.group_order)
            .field("renderers", &self.registry)
            .field("encoder", &self.encoder.name())
            .field("pending_ops", &self.ops.len())
            .field("pending_textures", &self.textures.len())
            .finish_non_exhaustive()
    }
}
