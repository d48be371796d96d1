//! WASM-compatible wrapper types for bitmap data.
//!
//! This module provides JavaScript-friendly types that wrap the core PrintDesk
//! types, handling the conversion between Rust and JavaScript data representations.

use printdesk_core::decode::Bitmap;
use wasm_bindgen::prelude::*;

/// A straight-alpha RGBA bitmap for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` and `image_data()`
/// copy it into JavaScript memory; keep the bitmap on the WASM side when it
/// only needs to be passed back into another binding.
#[wasm_bindgen]
pub struct JsBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a new JsBitmap from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Bitmap width in pixels
    /// * `height` - Bitmap height in pixels
    /// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsBitmap {
        JsBitmap {
            width,
            height,
            pixels,
        }
    }

    /// Get the bitmap width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the bitmap height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Returns RGBA pixel data as a Uint8ClampedArray, ready for
    /// `new ImageData(data, width, height)`.
    pub fn image_data(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.pixels.as_slice())
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {}
}

impl JsBitmap {
    pub(crate) fn from_bitmap(bitmap: Bitmap) -> Self {
        Self {
            width: bitmap.width,
            height: bitmap.height,
            pixels: bitmap.pixels,
        }
    }

    /// Convert back to a core Bitmap. This clones the pixel data.
    pub(crate) fn to_bitmap(&self) -> Bitmap {
        Bitmap::new(self.width, self.height, self.pixels.clone())
    }
}

/// Convert any core error into a string `JsValue`, echoing it to the console.
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    let message = err.to_string();
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}
