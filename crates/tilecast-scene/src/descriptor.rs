#![forbid(unsafe_code)]

//! Declarative inputs produced by the layout function each tick.

use tilecast_proto::Layer;

use crate::content::TileContent;

/// Desired state of one unit for this tick.
///
/// `w`/`h` are raster pixels and fixed for the unit's lifetime; `x`/`y` are
/// world units, local to `group` when grouped. An explicit `z` overrides the
/// group's depth.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDescriptor<D> {
    pub id: String,
    pub group: Option<String>,
    pub x: f32,
    pub y: f32,
    pub z: Option<f32>,
    pub w: u32,
    pub h: u32,
    pub scale: f32,
    pub layer: Layer,
    pub interactive: bool,
    pub draggable: bool,
    pub visible: bool,
    pub data: D,
}

impl<D: TileContent> UnitDescriptor<D> {
    /// A visible, ungrouped, base-layer unit at the origin with scale 1.
    pub fn new(id: impl Into<String>, w: u32, h: u32, data: D) -> Self {
        Self {
            id: id.into(),
            group: None,
            x: 0.0,
            y: 0.0,
            z: None,
            w,
            h,
            scale: 1.0,
            layer: Layer::Base,
            interactive: false,
            draggable: false,
            visible: true,
            data,
        }
    }

    /// The payload's kind.
    #[inline]
    pub fn kind(&self) -> D::Kind {
        self.data.kind()
    }

    #[must_use]
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub fn with_z(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn on_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    /// Parent the unit under a group; `x`/`y` become group-local.
    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    #[must_use]
    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Desired state of one group anchor for this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDescriptor {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: Option<f32>,
    pub visible: bool,
    /// Transition hint in milliseconds, passed through to `group-move`.
    pub duration: Option<u32>,
}

impl GroupDescriptor {
    /// A visible group anchored at `(x, y)`.
    pub fn new(id: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            z: None,
            visible: true,
            duration: None,
        }
    }

    #[must_use]
    pub fn with_z(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, millis: u32) -> Self {
        self.duration = Some(millis);
        self
    }
}
