#![forbid(unsafe_code)]

//! Texture payloads: encoded pixels for one quad, independent of topology.

use serde::{Deserialize, Serialize};
use tilecast_raster::encode::EncodedBitmap;

/// Encoded bitmap update for a single quad.
///
/// A receiver may see a texture before the `create` for its id (the two
/// travel on separate events) and must tolerate duplicates after a resync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TexPayload {
    pub id: String,
    /// Base64 image data (JPEG unless the scene uses another encoder).
    pub image: EncodedBitmap,
    pub w: u32,
    pub h: u32,
}

impl TexPayload {
    /// Build a payload for `id`.
    pub fn new(id: impl Into<String>, image: EncodedBitmap, w: u32, h: u32) -> Self {
        Self {
            id: id.into(),
            image,
            w,
            h,
        }
    }

    /// Approximate bytes this payload occupies on the wire.
    pub fn wire_len(&self) -> usize {
        self.id.len() + self.image.len()
    }
}
