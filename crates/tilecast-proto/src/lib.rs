#![forbid(unsafe_code)]

//! Wire protocol for tilecast.
//!
//! The sender emits two kinds of traffic on one broadcast channel: batched
//! [`SceneOp`]s describing quad topology and placement, and [`TexPayload`]s
//! carrying encoded pixels. Displays answer late joins with a
//! [`SyncRequest`] and report input with [`InteractEvent`]. [`HeadlessDisplay`] models a receiver so the whole
//! pipeline can be tested without a device.

pub mod envelope;
pub mod error;
pub mod headless;
pub mod layer;
pub mod op;
pub mod texture;

pub use envelope::{
    Envelope, INTERACT_EVENT, InteractEvent, InteractKind, KNOWN_EVENTS, SCENE_EVENT,
    SYNC_REQUEST_EVENT, SceneBatch, SyncRequest, TEX_BATCH_EVENT, TEX_EVENT, TexBatch,
};
pub use error::ProtoError;
pub use headless::{Anomaly, GroupNode, HeadlessDisplay, Quad};
pub use layer::{InvalidLayer, Layer};
pub use op::{OpKind, SceneOp};
pub use texture::TexPayload;
