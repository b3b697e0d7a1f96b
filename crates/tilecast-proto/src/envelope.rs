#![forbid(unsafe_code)]

//! Broadcast envelopes.
//!
//! Every message on the channel is one JSON object with an `event` name and
//! a `payload`:
//!
//! | Event          | Direction         | Payload                      |
//! |----------------|-------------------|------------------------------|
//! | `scene`        | sender → display  | `{ops: [SceneOp, ...]}`      |
//! | `tex`          | sender → display  | `{id, image, w, h}`          |
//! | `tex_batch`    | sender → display  | `{textures: [TexPayload]}`   |
//! | `sync_request` | display → sender  | `{deviceId, timestamp}`      |
//! | `interact`     | display → sender  | `{id, type, x?, y?, u?, v?, dx?, dy?, timestamp}` |
//!
//! The channel keeps no history, so a display that joins late sends
//! `sync_request` and the sender answers with a full resync.

use serde::{Deserialize, Serialize};

use crate::error::ProtoError;
use crate::op::SceneOp;
use crate::texture::TexPayload;

/// Event name for batched scene ops.
pub const SCENE_EVENT: &str = "scene";
/// Event name for texture payloads.
pub const TEX_EVENT: &str = "tex";
/// Event name for several textures sent in one message.
pub const TEX_BATCH_EVENT: &str = "tex_batch";
/// Event name for late-joiner resync requests.
pub const SYNC_REQUEST_EVENT: &str = "sync_request";
/// Event name for pointer input reported by a display.
pub const INTERACT_EVENT: &str = "interact";

/// Every event name [`Envelope`] can decode.
pub const KNOWN_EVENTS: [&str; 5] = [
    SCENE_EVENT,
    TEX_EVENT,
    TEX_BATCH_EVENT,
    SYNC_REQUEST_EVENT,
    INTERACT_EVENT,
];

/// Ops sent together in one `scene` event, applied in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneBatch {
    pub ops: Vec<SceneOp>,
}

/// Textures delivered together, applied in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TexBatch {
    pub textures: Vec<TexPayload>,
}

/// A display asking for the full current scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub device_id: String,
    /// Milliseconds since the Unix epoch, as reported by the display.
    pub timestamp: u64,
}

/// Pointer gesture reported by a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractKind {
    Hover,
    HoverMove,
    HoverExit,
    Tap,
    DragStart,
    DragDelta,
    DragEnd,
    /// A gesture this build does not know.
    #[serde(other)]
    Other,
}

/// Input on a quad. Positions are panel-local; `u`/`v` are the hit point
/// within the quad in `[0, 1]`. `dx`/`dy` are only set for `drag_delta`.
/// `id` is empty when the gesture hit no quad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InteractKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dx: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dy: Option<f32>,
    /// Milliseconds since the Unix epoch, as reported by the display.
    pub timestamp: u64,
}

impl InteractEvent {
    /// The gesture hit a quad.
    pub fn has_target(&self) -> bool {
        !self.id.is_empty()
    }
}

#[derive(Deserialize)]
struct EventTag {
    event: String,
}

/// One message on the broadcast channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum Envelope {
    Scene(SceneBatch),
    Tex(TexPayload),
    TexBatch(TexBatch),
    SyncRequest(SyncRequest),
    Interact(InteractEvent),
}

impl Envelope {
    /// The `event` name this envelope is sent under.
    pub fn event(&self) -> &'static str {
        match self {
            Self::Scene(_) => SCENE_EVENT,
            Self::Tex(_) => TEX_EVENT,
            Self::TexBatch(_) => TEX_BATCH_EVENT,
            Self::SyncRequest(_) => SYNC_REQUEST_EVENT,
            Self::Interact(_) => INTERACT_EVENT,
        }
    }

    /// The `event` name of a raw message, without decoding its payload.
    /// `None` when the text is not a JSON object with a string `event`.
    pub fn peek_event(s: &str) -> Option<String> {
        serde_json::from_str::<EventTag>(s).ok().map(|tag| tag.event)
    }

    /// Whether [`Envelope`] has a variant for this event name.
    pub fn is_known_event(event: &str) -> bool {
        KNOWN_EVENTS.contains(&event)
    }

    /// Encode as a single-line JSON string.
    pub fn to_json_string(&self) -> Result<String, ProtoError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, ProtoError> {
        Ok(serde_json::from_str(s)?)
    }
}
