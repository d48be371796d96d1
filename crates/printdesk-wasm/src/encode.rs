//! Image encoding WASM bindings.
//!
//! This module exposes the printdesk-core encoders to JavaScript for saving
//! exports and cropped images.
//!
//! # Functions
//!
//! - [`encode_png`] - Encode RGBA pixel data to PNG bytes
//! - [`encode_jpeg`] - Encode RGBA pixel data to JPEG bytes
//! - [`encode_bitmap_png`] - Encode a JsBitmap to PNG bytes
//!
//! # Example
//!
//! ```typescript
//! import { encode_png } from '@printdesk/wasm';
//!
//! const png = encode_png(bitmap.pixels(), bitmap.width, bitmap.height);
//! const blob = new Blob([png], { type: 'image/png' });
//! ```

use crate::types::{js_error, JsBitmap};
use printdesk_core::encode;
use wasm_bindgen::prelude::*;

/// Encode RGBA pixel data to PNG bytes.
///
/// # Errors
///
/// Returns an error if:
/// - The pixel data length doesn't match width * height * 4
/// - Width or height is zero
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(pixels, width, height).map_err(js_error)
}

/// Encode RGBA pixel data to JPEG bytes.
///
/// Transparent pixels are flattened onto white, and `quality` is clamped to
/// 1-100 (90 is a good default for print).
#[wasm_bindgen]
pub fn encode_jpeg(pixels: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality).map_err(js_error)
}

/// Encode a JsBitmap to PNG bytes.
#[wasm_bindgen]
pub fn encode_bitmap_png(bitmap: &JsBitmap) -> Result<Vec<u8>, JsValue> {
    let bitmap = bitmap.to_bitmap();
    encode::encode_png(&bitmap.pixels, bitmap.width, bitmap.height).map_err(js_error)
}
