#![forbid(unsafe_code)]

//! Raster kernel for tilecast: colours, tile surfaces, export pooling, and
//! bitmap encoding.
//!
//! ```
//! use tilecast_raster::color::PackedRgba;
//! use tilecast_raster::encode::{BitmapEncoder, JpegBase64, Quality};
//! use tilecast_raster::pool::SurfacePool;
//! use tilecast_raster::surface::Surface;
//!
//! let mut surface = Surface::new(100, 20);
//! surface.clear(PackedRgba::hex(0x0D0D18));
//! surface.fill_circle(10.0, 10.0, 5.0, PackedRgba::hex(0x4ADE80));
//!
//! let mut pool = SurfacePool::new();
//! let export = pool.checkout(100, 20);
//! export.copy_from(&surface, PackedRgba::BLACK);
//! let bitmap = JpegBase64.encode(export, Quality::DEFAULT).unwrap();
//! assert!(!bitmap.is_empty());
//! ```

pub mod color;
pub mod encode;
pub mod pool;
pub mod surface;

pub use color::PackedRgba;
pub use encode::{BitmapEncoder, EncodeError, EncodedBitmap, JpegBase64, PngBase64, Quality};
pub use pool::{ExportSurface, SurfacePool};
pub use surface::Surface;
