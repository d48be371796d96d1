//! Image decoding for placed objects.
//!
//! This module provides functionality for:
//! - Decoding PNG, JPEG, WebP, GIF and BMP bytes into RGBA bitmaps
//! - Applying the EXIF orientation tag so photos appear upright
//!
//! Decoding is a pure function of the input bytes, so callers may run it on
//! a worker thread and hand the resulting [`Bitmap`] to the page later.

mod raster;
mod types;

pub use raster::{decode_image, decode_image_no_orientation, get_orientation, is_supported_image};
pub use types::{Bitmap, DecodeError, Orientation, BYTES_PER_PIXEL};
