//! Image encoding for export and crop re-encoding.
//!
//! This module provides functionality for:
//! - Encoding RGBA bitmaps to PNG (lossless, used for exports and crops)
//! - Encoding RGBA bitmaps to JPEG with configurable quality
//!
//! Encoding is kept separate from rasterization so printing (which wants a
//! bitmap) and exporting (which wants bytes) share one render path.

mod jpeg;
mod png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{Bitmap, BYTES_PER_PIXEL};

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: &'static str,
        message: String,
    },
}

/// Output file format for an encoded bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// JPEG at the given quality (1-100).
    Jpeg { quality: u8 },
}

impl ExportFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg { .. } => "jpg",
        }
    }

    /// MIME type for downloads.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// Encode a bitmap to bytes in the requested format.
pub fn encode(bitmap: &Bitmap, format: ExportFormat) -> Result<Vec<u8>, EncodeError> {
    match format {
        ExportFormat::Png => encode_png(&bitmap.pixels, bitmap.width, bitmap.height),
        ExportFormat::Jpeg { quality } => {
            encode_jpeg(&bitmap.pixels, bitmap.width, bitmap.height, quality)
        }
    }
}

/// Shared validation for RGBA8 encoder input.
fn validate_rgba(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}
