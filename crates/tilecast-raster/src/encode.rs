#![forbid(unsafe_code)]

//! Bitmap encoding for texture payloads.
//!
//! Encoders turn a flattened [`ExportSurface`] into an [`EncodedBitmap`]: the
//! base64 text of a compressed image, ready to drop into a wire payload. The
//! default is lossy JPEG, whose fidelity is controlled per tile kind with a
//! [`Quality`] factor.

use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::pool::ExportSurface;

/// Lossy compression quality factor in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quality(f32);

impl Quality {
    /// Quality used when a tile kind has no explicit entry.
    pub const DEFAULT: Self = Self(0.6);

    /// Create a quality factor, clamping into `[0.0, 1.0]`.
    ///
    /// `NaN` maps to [`Quality::DEFAULT`].
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self::DEFAULT
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// The factor in `[0.0, 1.0]`.
    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// The factor as a JPEG quality percentage in `1..=100`.
    #[inline]
    pub fn as_percent(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Base64 text of an encoded image. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EncodedBitmap(Arc<str>);

impl EncodedBitmap {
    /// Wrap already-encoded base64 text.
    pub fn from_base64(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    /// The base64 text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the base64 text in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for an empty payload.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the base64 text back into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.0.as_bytes())
    }
}

impl fmt::Display for EncodedBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while encoding a tile bitmap.
#[derive(Debug)]
pub enum EncodeError {
    /// The surface has a zero dimension and cannot be encoded.
    EmptySurface { width: u32, height: u32 },
    /// The image codec rejected the buffer.
    Image(image::ImageError),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySurface { width, height } => {
                write!(f, "cannot encode empty surface {width}x{height}")
            }
            Self::Image(err) => write!(f, "image encode error: {err}"),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptySurface { .. } => None,
            Self::Image(err) => Some(err),
        }
    }
}

impl From<image::ImageError> for EncodeError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err)
    }
}

/// Pluggable bitmap codec.
pub trait BitmapEncoder {
    /// Short codec name for logging.
    fn name(&self) -> &'static str;

    /// Encode the staging buffer at the given quality.
    fn encode(
        &mut self,
        surface: &ExportSurface,
        quality: Quality,
    ) -> Result<EncodedBitmap, EncodeError>;
}

fn ensure_non_empty(surface: &ExportSurface) -> Result<(), EncodeError> {
    if surface.width() == 0 || surface.height() == 0 {
        return Err(EncodeError::EmptySurface {
            width: surface.width(),
            height: surface.height(),
        });
    }
    Ok(())
}

/// Baseline JPEG, base64 encoded. The default codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegBase64;

impl BitmapEncoder for JpegBase64 {
    fn name(&self) -> &'static str {
        "jpeg"
    }

    fn encode(
        &mut self,
        surface: &ExportSurface,
        quality: Quality,
    ) -> Result<EncodedBitmap, EncodeError> {
        ensure_non_empty(surface)?;
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "encode_jpeg",
            width = surface.width(),
            height = surface.height(),
            quality = quality.as_percent()
        )
        .entered();

        let mut out = Cursor::new(Vec::new());
        let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.as_percent());
        encoder.encode(
            surface.as_rgb(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(EncodedBitmap::from_base64(STANDARD.encode(out.into_inner())))
    }
}

/// Lossless PNG, base64 encoded. Ignores quality.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngBase64;

impl BitmapEncoder for PngBase64 {
    fn name(&self) -> &'static str {
        "png"
    }

    fn encode(
        &mut self,
        surface: &ExportSurface,
        _quality: Quality,
    ) -> Result<EncodedBitmap, EncodeError> {
        ensure_non_empty(surface)?;
        let mut out = Cursor::new(Vec::new());
        PngEncoder::new(&mut out).write_image(
            surface.as_rgb(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(EncodedBitmap::from_base64(STANDARD.encode(out.into_inner())))
    }
}
