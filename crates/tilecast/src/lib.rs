#![forbid(unsafe_code)]

//! tilecast public facade.
//!
//! Re-exports the scene, wire protocol, raster kernel, and (with the default
//! `tiles` feature) the built-in tile kinds, plus a prelude for the usual
//! loop:
//!
//! ```
//! use tilecast::prelude::*;
//!
//! let mut scene = Scene::new(tilecast::tiles::registry(), tilecast::tiles::quality_table());
//! let mut out = Broadcaster::new(Vec::new());
//!
//! scene.reconcile(
//!     [UnitDescriptor::new("bar", 120, 8, Tile::Progress { fraction: 0.4, color: PackedRgba::hex(0x4ADE80) })],
//!     [],
//! );
//! scene.render_dirty();
//! let report = out.tick(&mut scene)?;
//! assert_eq!((report.ops, report.textures), (1, 1));
//! # Ok::<(), tilecast::Error>(())
//! ```

use std::fmt;

// --- Raster re-exports ------------------------------------------------------

pub use tilecast_raster::{
    BitmapEncoder, EncodeError, EncodedBitmap, JpegBase64, PackedRgba, PngBase64, Quality,
    Surface, SurfacePool,
};

// --- Protocol re-exports ----------------------------------------------------

pub use tilecast_proto::{
    Envelope, HeadlessDisplay, InteractEvent, InteractKind, Layer, ProtoError, SceneBatch, SceneOp,
    SyncRequest, TexBatch, TexPayload,
};

// --- Scene re-exports -------------------------------------------------------

pub use tilecast_scene::{
    BroadcastError, BroadcastQueue, Broadcaster, DrawFn, GroupDescriptor, Inbound, QualityTable,
    RendererRegistry, ResizePolicy, Scene, SceneConfig, SendBudget, Signature, TickReport,
    TileContent, UnitDescriptor, WorldPosition,
};

#[cfg(feature = "logging")]
pub mod logging;

// --- Errors -----------------------------------------------------------------

/// Top-level error for tilecast hosts.
#[derive(Debug)]
pub enum Error {
    /// Writing to or reading from the channel failed.
    Broadcast(BroadcastError),
    /// Envelope encode/decode failed outside a broadcaster.
    Proto(ProtoError),
    /// A bitmap could not be encoded.
    Encode(EncodeError),
    /// Subscriber installation failed.
    Logging(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Broadcast(err) => write!(f, "{err}"),
            Self::Proto(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "{err}"),
            Self::Logging(msg) => write!(f, "logging setup failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Broadcast(err) => Some(err),
            Self::Proto(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<BroadcastError> for Error {
    fn from(err: BroadcastError) -> Self {
        Self::Broadcast(err)
    }
}

impl From<ProtoError> for Error {
    fn from(err: ProtoError) -> Self {
        Self::Proto(err)
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Self::Encode(err)
    }
}

/// Standard result type for tilecast hosts.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude ----------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Broadcaster, Envelope, Error, GroupDescriptor, Inbound, Layer, PackedRgba, Result, Scene,
        SceneConfig, SceneOp, SendBudget, Signature, TileContent, UnitDescriptor,
    };

    #[cfg(feature = "tiles")]
    pub use crate::tiles::{Tile, TileKind};

    pub use crate::{proto, raster, scene};
}

pub use tilecast_proto as proto;
pub use tilecast_raster as raster;
pub use tilecast_scene as scene;
#[cfg(feature = "tiles")]
pub use tilecast_tiles as tiles;
