//! File classification and multi-selection for the file browser view.

use printdesk_core::library::{FileKind, Selection, MAX_MULTI_SELECT};
use wasm_bindgen::prelude::*;

/// Classify a file name: `"image"`, `"document"` or `"other"`.
#[wasm_bindgen]
pub fn classify_file(name: &str) -> String {
    match FileKind::from_name(name) {
        FileKind::Image => "image",
        FileKind::Document => "document",
        FileKind::Other => "other",
    }
    .to_string()
}

/// Ordered selection of up to five images bound for the editor.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsSelection {
    inner: Selection,
}

#[wasm_bindgen]
impl JsSelection {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsSelection {
        JsSelection::default()
    }

    /// Maximum number of selected images.
    pub fn limit() -> usize {
        MAX_MULTI_SELECT
    }

    /// Add or remove a path; `false` means the limit was reached.
    pub fn toggle(&mut self, path: &str) -> bool {
        self.inner.toggle(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inner.contains(path)
    }

    /// Selected paths in selection order.
    pub fn paths(&self) -> Vec<String> {
        self.inner.paths().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}
