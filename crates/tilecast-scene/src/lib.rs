#![forbid(unsafe_code)]

//! Retained tile scene for tilecast.
//!
//! A [`Scene`] holds live [`Unit`]s and [`Group`]s, reconciles them against a
//! fresh desired list each tick, redraws only units whose content signature
//! changed, and queues the minimal stream of [`SceneOp`]s and
//! [`TexPayload`]s a remote display needs to mirror it.
//!
//! ```
//! use tilecast_raster::{PackedRgba, PngBase64};
//! use tilecast_scene::{QualityTable, RendererRegistry, Scene, Signature, TileContent, UnitDescriptor};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! struct Swatch;
//!
//! struct Fill(u32);
//!
//! impl TileContent for Fill {
//!     type Kind = Swatch;
//!     fn kind(&self) -> Swatch { Swatch }
//!     fn signature(&self) -> Signature { Signature::of(&self.0) }
//! }
//!
//! let registry = RendererRegistry::<Fill>::new().with(Swatch, |s, w, h, d| {
//!     s.fill_rect(0, 0, w, h, PackedRgba::hex(d.0));
//! });
//! let mut scene = Scene::new(registry, QualityTable::new()).with_encoder(PngBase64);
//!
//! scene.reconcile([UnitDescriptor::new("a", 100, 20, Fill(0x4ADE80))], []);
//! assert_eq!(scene.render_dirty(), 1);
//! assert_eq!(scene.take_ops(10).len(), 1);
//! assert_eq!(scene.take_textures(10).len(), 1);
//!
//! // Moving an unchanged tile costs one `move` and no texture.
//! scene.reconcile([UnitDescriptor::new("a", 100, 20, Fill(0x4ADE80)).at(5.0, 0.0)], []);
//! assert_eq!(scene.render_dirty(), 0);
//! assert_eq!(scene.take_ops(10).len(), 1);
//! assert_eq!(scene.pending_textures(), 0);
//! ```
//!
//! [`SceneOp`]: tilecast_proto::SceneOp
//! [`TexPayload`]: tilecast_proto::TexPayload

pub mod broadcast;
pub mod config;
pub mod content;
pub mod counting_writer;
pub mod descriptor;
pub mod error;
pub mod group;
mod queue;
pub mod quality;
pub mod registry;
pub mod scene;
pub mod unit;

pub use broadcast::{Broadcaster, Inbound, TickReport};
pub use config::{ResizePolicy, SceneConfig, SendBudget};
pub use content::{Signature, TileContent};
pub use descriptor::{GroupDescriptor, UnitDescriptor};
pub use error::BroadcastError;
pub use group::Group;
pub use quality::QualityTable;
pub use queue::BroadcastQueue;
pub use registry::{DrawFn, RendererRegistry};
pub use scene::{Scene, WorldPosition};
pub use unit::Unit;
