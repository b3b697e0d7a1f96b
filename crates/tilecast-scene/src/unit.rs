#![forbid(unsafe_code)]

//! Live unit: layout fields, owned raster, and dirty tracking.
//!
//! Two independent flags drive emission:
//!
//! - `dirty`: pixels must be redrawn (content signature changed).
//! - `position_dirty` / `visibility_dirty`: the remote quad must be moved or
//!   shown/hidden, which never touches pixels.

use std::fmt;

use tilecast_proto::{Layer, SceneOp};
use tilecast_raster::{BitmapEncoder, EncodeError, EncodedBitmap, PackedRgba, Quality, Surface, SurfacePool};

use crate::content::{Signature, TileContent};
use crate::descriptor::UnitDescriptor;
use crate::registry::DrawFn;

/// One live tile.
pub struct Unit<D: TileContent> {
    id: String,
    kind: D::Kind,
    group: Option<String>,
    x: f32,
    y: f32,
    z: Option<f32>,
    w: u32,
    h: u32,
    scale: f32,
    layer: Layer,
    interactive: bool,
    draggable: bool,
    visible: bool,
    data: D,
    renderer: Option<DrawFn<D>>,
    surface: Surface,
    signature: Signature,
    dirty: bool,
    cached: Option<EncodedBitmap>,
    created: bool,
    position_dirty: bool,
    visibility_dirty: bool,
    has_content: bool,
    sent_group: Option<String>,
}

impl<D: TileContent> Unit<D> {
    /// Build a unit from its first descriptor. The surface is allocated once
    /// at `w`×`h` and the unit starts dirty.
    pub fn new(desc: UnitDescriptor<D>, renderer: Option<DrawFn<D>>) -> Self {
        let signature = desc.data.signature();
        Self {
            id: desc.id,
            kind: desc.data.kind(),
            group: desc.group,
            x: desc.x,
            y: desc.y,
            z: desc.z,
            w: desc.w,
            h: desc.h,
            scale: desc.scale,
            layer: desc.layer,
            interactive: desc.interactive,
            draggable: desc.draggable,
            visible: desc.visible,
            data: desc.data,
            renderer,
            surface: Surface::new(desc.w, desc.h),
            signature,
            dirty: true,
            cached: None,
            created: false,
            position_dirty: false,
            visibility_dirty: false,
            has_content: false,
            sent_group: None,
        }
    }

    /// Copy layout fields from `desc`.
    ///
    /// Returns true if any of position, depth, scale, layer, group, or
    /// visibility changed. `w`, `h`, and `data` are not touched.
    pub fn apply_descriptor(&mut self, desc: &UnitDescriptor<D>) -> bool {
        let spatial = self.x != desc.x
            || self.y != desc.y
            || self.z != desc.z
            || self.scale != desc.scale
            || self.layer != desc.layer
            || self.group != desc.group;
        let visibility = self.visible != desc.visible;

        self.x = desc.x;
        self.y = desc.y;
        self.z = desc.z;
        self.scale = desc.scale;
        self.layer = desc.layer;
        self.group.clone_from(&desc.group);
        self.visible = desc.visible;
        self.interactive = desc.interactive;
        self.draggable = desc.draggable;

        if spatial {
            self.position_dirty = true;
        }
        if visibility {
            self.visibility_dirty = true;
        }
        spatial || visibility
    }

    /// Store a new signature. On change the unit becomes dirty and the
    /// cached bitmap is dropped.
    pub fn update_signature(&mut self, signature: Signature) -> bool {
        if self.signature == signature {
            return false;
        }
        self.signature = signature;
        self.dirty = true;
        self.cached = None;
        true
    }

    /// Replace the payload, updating the signature from it.
    pub fn set_data(&mut self, data: D) -> bool {
        let signature = data.signature();
        self.data = data;
        self.update_signature(signature)
    }

    pub fn set_renderer(&mut self, renderer: Option<DrawFn<D>>) {
        self.renderer = renderer;
    }

    /// Redraw if dirty and a renderer is bound. Returns whether it drew.
    pub fn render(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        let Some(draw) = self.renderer.as_ref() else {
            return false;
        };
        self.surface.clear(PackedRgba::TRANSPARENT);
        draw(&mut self.surface, self.w, self.h, &self.data);
        self.dirty = false;
        self.cached = None;
        self.has_content = true;
        true
    }

    /// The encoded bitmap, encoding through a pooled export surface on a
    /// cache miss.
    pub fn encoded_bitmap(
        &mut self,
        pool: &mut SurfacePool,
        encoder: &mut dyn BitmapEncoder,
        quality: Quality,
        background: PackedRgba,
    ) -> Result<EncodedBitmap, EncodeError> {
        if let Some(cached) = &self.cached {
            return Ok(cached.clone());
        }
        let export = pool.checkout(self.w, self.h);
        export.copy_from(&self.surface, background);
        let bitmap = encoder.encode(export, quality)?;
        self.cached = Some(bitmap.clone());
        Ok(bitmap)
    }

    pub(crate) fn set_local_position(&mut self, x: f32, y: f32) {
        if self.x != x || self.y != y {
            self.x = x;
            self.y = y;
            self.position_dirty = true;
        }
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.visibility_dirty = true;
        }
    }

    /// `create` op from the current layout.
    pub fn create_op(&self) -> SceneOp {
        SceneOp::Create {
            id: self.id.clone(),
            x: self.x,
            y: self.y,
            z: self.z,
            w: self.w,
            h: self.h,
            scale: self.scale,
            layer: self.layer,
            group: self.group.clone(),
            interactive: self.interactive,
            draggable: self.draggable,
        }
    }

    /// `move` op from the current layout.
    pub fn move_op(&self, duration: u32) -> SceneOp {
        SceneOp::Move {
            id: self.id.clone(),
            x: self.x,
            y: self.y,
            z: self.z,
            scale: self.scale,
            layer: self.layer,
            group: self.group.clone(),
            duration,
        }
    }

    /// Record that a `create` for the current layout was queued.
    pub(crate) fn mark_created(&mut self) {
        self.created = true;
        self.position_dirty = false;
        self.visibility_dirty = false;
        self.sent_group.clone_from(&self.group);
    }

    /// Record that a `move` for the current layout was queued.
    pub(crate) fn mark_moved(&mut self) {
        self.position_dirty = false;
        self.sent_group.clone_from(&self.group);
    }

    pub(crate) fn take_visibility_dirty(&mut self) -> bool {
        std::mem::take(&mut self.visibility_dirty)
    }

    /// The remote dropped this quad with its group.
    pub(crate) fn forget_remote(&mut self) {
        self.created = false;
        self.sent_group = None;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> D::Kind {
        self.kind
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Local position (group-relative when grouped).
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn z(&self) -> Option<f32> {
        self.z
    }

    pub fn size(&self) -> (u32, u32) {
        (self.w, self.h)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Pixels are stale and need a redraw.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn cached_bitmap(&self) -> Option<&EncodedBitmap> {
        self.cached.as_ref()
    }

    /// A `create` for this unit has been queued and not since undone.
    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn is_position_dirty(&self) -> bool {
        self.position_dirty
    }

    pub fn is_visibility_dirty(&self) -> bool {
        self.visibility_dirty
    }

    /// The surface has been drawn at least once.
    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// The group the remote last parented this quad under.
    pub fn sent_group(&self) -> Option<&str> {
        self.sent_group.as_deref()
    }
}

impl<D: TileContent + fmt::Debug> fmt::Debug for Unit<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("group", &self.group)
            .field("pos", &(self.x, self.y, self.z))
            .field("size", &(self.w, self.h))
            .field("visible", &self.visible)
            .field("data", &self.data)
            .field("dirty", &self.dirty)
            .field("created", &self.created)
            .field("position_dirty", &self.position_dirty)
            .field("visibility_dirty", &self.visibility_dirty)
            .finish_non_exhaustive()
    }
}
