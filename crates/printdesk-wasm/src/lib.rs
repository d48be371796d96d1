//! PrintDesk WASM - WebAssembly bindings for PrintDesk
//!
//! This crate provides WASM bindings to expose the printdesk-core page editor
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `editor` - The page editor (`JsEditor`)
//! - `types` - WASM-compatible wrapper types for bitmap data
//! - `decode` - Image decoding bindings
//! - `encode` - PNG and JPEG encoding bindings
//! - `transform` - Crop and rotation geometry bindings
//! - `library` - File classification and multi-selection
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor } from '@printdesk/wasm';
//!
//! await init();
//!
//! const editor = new JsEditor();
//! editor.add_image(new Uint8Array(await file.arrayBuffer()));
//! const png = editor.export_png();
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod editor;
mod encode;
mod library;
mod transform;
mod types;

// Re-export public types
pub use decode::{decode_image, is_supported_image};
pub use editor::JsEditor;
pub use encode::{encode_bitmap_png, encode_jpeg, encode_png};
pub use library::{classify_file, JsSelection};
pub use transform::{crop_bitmap, normalize_angle, rotated_bounds};
pub use types::JsBitmap;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    log::debug!("printdesk-wasm {} loaded", env!("CARGO_PKG_VERSION"));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
