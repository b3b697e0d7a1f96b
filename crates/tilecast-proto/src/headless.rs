#![forbid(unsafe_code)]

//! Headless model of a remote display.
//!
//! `HeadlessDisplay` applies scene ops and textures in received order with
//! the same tolerance rules the real device uses, so the full pipeline can be
//! asserted without hardware:
//!
//! - `create` for an id that already exists updates it in place.
//! - A texture for an unknown id is buffered and applied on its `create`.
//! - `group-destroy` removes the group and every quad parented to it.
//! - `create` naming an unknown group implicitly creates that group at the
//!   origin.
//! - `move`/`destroy`/`visibility` for unknown ids are ignored.
//!
//! Every tolerated irregularity is recorded as an [`Anomaly`] so tests can
//! check ordering invariants on the sender side.

use std::collections::HashMap;

use tilecast_raster::encode::EncodedBitmap;

use crate::envelope::Envelope;
use crate::layer::Layer;
use crate::op::{OpKind, SceneOp};
use crate::texture::TexPayload;

/// A textured quad as the display sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: Option<f32>,
    pub w: u32,
    pub h: u32,
    pub scale: f32,
    pub layer: Layer,
    pub group: Option<String>,
    pub interactive: bool,
    pub draggable: bool,
    pub visible: bool,
    pub texture: Option<EncodedBitmap>,
    /// How many textures have been applied to this quad.
    pub texture_updates: u32,
}

/// A group anchor as the display sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: Option<f32>,
    pub visible: bool,
}

/// An irregularity the display tolerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// A quad op arrived for an id with no live quad.
    UnknownQuad { op: OpKind, id: String },
    /// A `group-move` or `group-destroy` arrived for an unknown group.
    UnknownGroup { op: OpKind, id: String },
    /// `create` arrived for a quad that already exists.
    DuplicateCreate { id: String },
    /// A texture arrived before the quad's `create`.
    TextureBeforeCreate { id: String },
}

/// In-memory stand-in for the remote renderer.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    quads: HashMap<String, Quad>,
    groups: HashMap<String, GroupNode>,
    buffered: HashMap<String, TexPayload>,
    anomalies: Vec<Anomaly>,
    ops_applied: u64,
    textures_applied: u64,
}

impl HeadlessDisplay {
    /// Create an empty display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one envelope. Sync requests are outbound-only and ignored.
    pub fn apply_envelope(&mut self, envelope: &Envelope) {
        match envelope {
            Envelope::Scene(batch) => self.apply_ops(&batch.ops),
            Envelope::Tex(tex) => self.apply_texture(tex),
            Envelope::TexBatch(batch) => {
                for tex in &batch.textures {
                    self.apply_texture(tex);
                }
            }
            Envelope::SyncRequest(_) | Envelope::Interact(_) => {}
        }
    }

    /// Apply ops in order.
    pub fn apply_ops<'a>(&mut self, ops: impl IntoIterator<Item = &'a SceneOp>) {
        for op in ops {
            self.apply_op(op);
        }
    }

    /// Apply a single op.
    pub fn apply_op(&mut self, op: &SceneOp) {
        self.ops_applied += 1;
        match op {
            SceneOp::Create {
                id,
                x,
                y,
                z,
                w,
                h,
                scale,
                layer,
                group,
                interactive,
                draggable,
            } => {
                if let Some(group) = group {
                    self.ensure_group(group);
                }
                if let Some(quad) = self.quads.get_mut(id) {
                    self.anomalies
                        .push(Anomaly::DuplicateCreate { id: id.clone() });
                    quad.x = *x;
                    quad.y = *y;
                    quad.z = *z;
                    quad.scale = *scale;
                    quad.layer = *layer;
                    quad.group = group.clone();
                    return;
                }
                let mut quad = Quad {
                    id: id.clone(),
                    x: *x,
                    y: *y,
                    z: *z,
                    w: *w,
                    h: *h,
                    scale: *scale,
                    layer: *layer,
                    group: group.clone(),
                    interactive: *interactive,
                    draggable: *draggable,
                    visible: true,
                    texture: None,
                    texture_updates: 0,
                };
                if let Some(tex) = self.buffered.remove(id) {
                    quad.texture = Some(tex.image);
                    quad.texture_updates = 1;
                }
                self.quads.insert(id.clone(), quad);
            }
            SceneOp::Move {
                id,
                x,
                y,
                z,
                scale,
                layer,
                group,
                ..
            } => {
                if let Some(group) = group {
                    self.ensure_group(group);
                }
                match self.quads.get_mut(id) {
                    Some(quad) => {
                        quad.x = *x;
                        quad.y = *y;
                        if z.is_some() {
                            quad.z = *z;
                        }
                        quad.scale = *scale;
                        quad.layer = *layer;
                        quad.group = group.clone();
                    }
                    None => self.unknown_quad(OpKind::Move, id),
                }
            }
            SceneOp::Destroy { id } => {
                if self.quads.remove(id).is_none() {
                    self.unknown_quad(OpKind::Destroy, id);
                }
            }
            SceneOp::Visibility { id, visible } => match self.quads.get_mut(id) {
                Some(quad) => quad.visible = *visible,
                None => self.unknown_quad(OpKind::Visibility, id),
            },
            SceneOp::Group {
                id,
                x,
                y,
                z,
                visible,
            } => {
                let node = self.ensure_group(id);
                node.x = *x;
                node.y = *y;
                node.z = *z;
                node.visible = *visible;
            }
            SceneOp::GroupMove {
                id,
                x,
                y,
                z,
                visible,
                ..
            } => match self.groups.get_mut(id) {
                Some(node) => {
                    node.x = *x;
                    node.y = *y;
                    node.z = *z;
                    node.visible = *visible;
                }
                None => self.anomalies.push(Anomaly::UnknownGroup {
                    op: OpKind::GroupMove,
                    id: id.clone(),
                }),
            },
            SceneOp::GroupDestroy { id } => {
                if self.groups.remove(id).is_none() {
                    self.anomalies.push(Anomaly::UnknownGroup {
                        op: OpKind::GroupDestroy,
                        id: id.clone(),
                    });
                    return;
                }
                self.quads
                    .retain(|_, quad| quad.group.as_deref() != Some(id.as_str()));
            }
        }
    }

    /// Apply a texture, buffering it if the quad does not exist yet.
    pub fn apply_texture(&mut self, tex: &TexPayload) {
        self.textures_applied += 1;
        match self.quads.get_mut(&tex.id) {
            Some(quad) => {
                quad.texture = Some(tex.image.clone());
                quad.texture_updates += 1;
            }
            None => {
                self.anomalies.push(Anomaly::TextureBeforeCreate {
                    id: tex.id.clone(),
                });
                self.buffered.insert(tex.id.clone(), tex.clone());
            }
        }
    }

    fn ensure_group(&mut self, id: &str) -> &mut GroupNode {
        self.groups
            .entry(id.to_string())
            .or_insert_with(|| GroupNode {
                id: id.to_string(),
                x: 0.0,
                y: 0.0,
                z: None,
                visible: true,
            })
    }

    fn unknown_quad(&mut self, op: OpKind, id: &str) {
        self.anomalies.push(Anomaly::UnknownQuad {
            op,
            id: id.to_string(),
        });
    }

    /// Look up a quad.
    pub fn quad(&self, id: &str) -> Option<&Quad> {
        self.quads.get(id)
    }

    /// Look up a group.
    pub fn group(&self, id: &str) -> Option<&GroupNode> {
        self.groups.get(id)
    }

    /// Number of live quads.
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    /// Number of live groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Ids of live quads, sorted.
    pub fn quad_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.quads.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Quad position composed with its group anchor.
    pub fn world_position(&self, id: &str) -> Option<(f32, f32, Option<f32>)> {
        let quad = self.quads.get(id)?;
        let group = quad.group.as_deref().and_then(|g| self.groups.get(g));
        Some(match group {
            Some(g) => (g.x + quad.x, g.y + quad.y, quad.z.or(g.z)),
            None => (quad.x, quad.y, quad.z),
        })
    }

    /// Whether a quad would be drawn (itself and its group visible).
    pub fn is_shown(&self, id: &str) -> bool {
        let Some(quad) = self.quads.get(id) else {
            return false;
        };
        let group_visible = quad
            .group
            .as_deref()
            .and_then(|g| self.groups.get(g))
            .is_none_or(|g| g.visible);
        quad.visible && group_visible && quad.texture.is_some()
    }

    /// Tolerated irregularities, in arrival order.
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    /// Take and reset the anomaly log.
    pub fn take_anomalies(&mut self) -> Vec<Anomaly> {
        std::mem::take(&mut self.anomalies)
    }

    /// Textures waiting for their quad's `create`.
    pub fn buffered_textures(&self) -> usize {
        self.buffered.len()
    }

    /// Total ops applied.
    pub fn ops_applied(&self) -> u64 {
        self.ops_applied
    }

    /// Total textures applied (including buffered ones).
    pub fn textures_applied(&self) -> u64 {
        self.textures_applied
    }
}
