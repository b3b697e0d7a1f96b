#![forbid(unsafe_code)]

//! Scene ops: minimal topology and position instructions for the remote.
//!
//! Ops are JSON objects tagged by `op`:
//!
//! ```text
//! {"op":"create","id":"a","x":0.0,"y":0.0,"w":100,"h":20,"s":1.0,"layer":0,"interactive":false,"draggable":false}
//! {"op":"move","id":"a","x":5.0,"y":0.0,"s":1.0,"layer":0,"duration":0}
//! {"op":"destroy","id":"a"}
//! {"op":"visibility","id":"a","visible":false}
//! {"op":"group","id":"g","x":10.0,"y":20.0,"visible":true}
//! {"op":"group-move","id":"g","x":12.0,"y":20.0,"visible":true,"duration":300}
//! {"op":"group-destroy","id":"g"}
//! ```
//!
//! Optional fields (`z`, `group`, group-move `duration`) are omitted when
//! absent. Coordinates are world units; `w`/`h` are texture pixels; `s` is
//! world units per pixel.

use serde::{Deserialize, Serialize};

use crate::layer::Layer;

/// A single scene instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum SceneOp {
    /// Create a textured quad.
    Create {
        id: String,
        x: f32,
        y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z: Option<f32>,
        w: u32,
        h: u32,
        #[serde(rename = "s")]
        scale: f32,
        layer: Layer,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group: Option<String>,
        interactive: bool,
        draggable: bool,
    },
    /// Reposition an existing quad.
    Move {
        id: String,
        x: f32,
        y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z: Option<f32>,
        #[serde(rename = "s")]
        scale: f32,
        layer: Layer,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group: Option<String>,
        /// Transition time in milliseconds; `0` is instant.
        #[serde(default)]
        duration: u32,
    },
    /// Remove a quad.
    Destroy { id: String },
    /// Show or hide a quad.
    Visibility { id: String, visible: bool },
    /// Create or position a group anchor.
    Group {
        id: String,
        x: f32,
        y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z: Option<f32>,
        visible: bool,
    },
    /// Reposition an existing group anchor.
    GroupMove {
        id: String,
        x: f32,
        y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z: Option<f32>,
        visible: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<u32>,
    },
    /// Remove a group anchor and everything parented under it.
    GroupDestroy { id: String },
}

/// Discriminant of a [`SceneOp`], handy for filtering and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Create,
    Move,
    Destroy,
    Visibility,
    Group,
    GroupMove,
    GroupDestroy,
}

impl SceneOp {
    /// The unit or group id this op targets.
    pub fn id(&self) -> &str {
        match self {
            Self::Create { id, .. }
            | Self::Move { id, .. }
            | Self::Destroy { id }
            | Self::Visibility { id, .. }
            | Self::Group { id, .. }
            | Self::GroupMove { id, .. }
            | Self::GroupDestroy { id } => id,
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> OpKind {
        match self {
            Self::Create { .. } => OpKind::Create,
            Self::Move { .. } => OpKind::Move,
            Self::Destroy { .. } => OpKind::Destroy,
            Self::Visibility { .. } => OpKind::Visibility,
            Self::Group { .. } => OpKind::Group,
            Self::GroupMove { .. } => OpKind::GroupMove,
            Self::GroupDestroy { .. } => OpKind::GroupDestroy,
        }
    }

    /// True for ops addressing group anchors rather than quads.
    pub fn targets_group(&self) -> bool {
        matches!(
            self.kind(),
            OpKind::Group | OpKind::GroupMove | OpKind::GroupDestroy
        )
    }

    /// Wire tag (`"create"`, `"group-move"`, ...).
    pub fn tag(&self) -> &'static str {
        match self.kind() {
            OpKind::Create => "create",
            OpKind::Move => "move",
            OpKind::Destroy => "destroy",
            OpKind::Visibility => "visibility",
            OpKind::Group => "group",
            OpKind::GroupMove => "group-move",
            OpKind::GroupDestroy => "group-destroy",
        }
    }
}
