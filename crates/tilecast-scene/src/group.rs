#![forbid(unsafe_code)]

//! Live group anchor. Holds no raster state.

use tilecast_proto::SceneOp;

use crate::descriptor::GroupDescriptor;

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    id: String,
    x: f32,
    y: f32,
    z: Option<f32>,
    visible: bool,
    duration: Option<u32>,
}

impl Group {
    pub fn new(desc: &GroupDescriptor) -> Self {
        Self {
            id: desc.id.clone(),
            x: desc.x,
            y: desc.y,
            z: desc.z,
            visible: desc.visible,
            duration: desc.duration,
        }
    }

    /// Adopt `desc`; returns true if position, depth, or visibility changed.
    /// The duration hint is always taken but never counts as a change.
    pub fn apply(&mut self, desc: &GroupDescriptor) -> bool {
        let changed = self.x != desc.x
            || self.y != desc.y
            || self.z != desc.z
            || self.visible != desc.visible;
        self.x = desc.x;
        self.y = desc.y;
        self.z = desc.z;
        self.visible = desc.visible;
        self.duration = desc.duration;
        changed
    }

    pub fn create_op(&self) -> SceneOp {
        SceneOp::Group {
            id: self.id.clone(),
            x: self.x,
            y: self.y,
            z: self.z,
            visible: self.visible,
        }
    }

    pub fn move_op(&self) -> SceneOp {
        SceneOp::GroupMove {
            id: self.id.clone(),
            x: self.x,
            y: self.y,
            z: self.z,
            visible: self.visible,
            duration: self.duration,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn z(&self) -> Option<f32> {
        self.z
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn duration(&self) -> Option<u32> {
        self.duration
    }
}
