//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode PNG/JPEG/WebP/GIF/BMP bytes to an RGBA bitmap
//! - [`is_supported_image`] - Check whether bytes look like a supported format
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, is_supported_image } from '@printdesk/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (is_supported_image(bytes)) {
//!   const bitmap = decode_image(bytes);
//!   console.log(`Decoded ${bitmap.width}x${bitmap.height}`);
//! }
//! ```

use crate::types::{js_error, JsBitmap};
use printdesk_core::decode;
use wasm_bindgen::prelude::*;

/// Decode image bytes, applying EXIF orientation.
///
/// # Errors
///
/// Returns an error string if the bytes are not a supported format or the
/// file is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsBitmap, JsValue> {
    decode::decode_image(bytes)
        .map(JsBitmap::from_bitmap)
        .map_err(js_error)
}

/// Check whether the bytes start like a supported image format.
#[wasm_bindgen]
pub fn is_supported_image(bytes: &[u8]) -> bool {
    decode::is_supported_image(bytes)
}
