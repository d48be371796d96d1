//! The page editor exposed to JavaScript.
//!
//! `JsEditor` owns one [`EditorSession`]. Object ids cross the boundary as
//! plain numbers; an id that no longer exists is treated the same way the
//! core treats it (ignored by transforms, reported by operations that need
//! the object).
//!
//! # Example
//!
//! ```typescript
//! import { JsEditor } from '@printdesk/wasm';
//!
//! const editor = new JsEditor();
//! const id = editor.add_image(bytes);
//! editor.rotate_active(90);
//! const preview = editor.render_preview();
//! ctx.putImageData(new ImageData(preview.image_data(), preview.width), 0, 0);
//! ```

use crate::types::{js_error, JsBitmap};
use printdesk_core::{
    AddOptions, CropRect, EditorConfig, EditorSession, LoadTicket, ObjectId, ObjectSummary,
};
use wasm_bindgen::prelude::*;

/// Uniform scale for images added from the file picker.
pub const PICKER_SCALE: f64 = 0.5;

#[wasm_bindgen]
pub struct JsEditor {
    session: EditorSession,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor from an optional JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<JsEditor, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(js_error)?,
            None => EditorConfig::default(),
        };
        let session = EditorSession::new(config).map_err(js_error)?;
        Ok(JsEditor { session })
    }

    /// Preview width of the page in CSS pixels.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.session.page().width()
    }

    /// Preview height of the page in CSS pixels.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.session.page().height()
    }

    #[wasm_bindgen(getter)]
    pub fn export_scale(&self) -> f64 {
        self.session.page().export_scale()
    }

    /// `"light"` or `"dark"`.
    #[wasm_bindgen(getter)]
    pub fn theme(&self) -> String {
        match self.session.config().theme {
            printdesk_core::Theme::Light => "light".to_string(),
            printdesk_core::Theme::Dark => "dark".to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn export_filename(&self) -> String {
        self.session.config().export_filename.clone()
    }

    /// Number of objects on the page.
    #[wasm_bindgen(getter)]
    pub fn object_count(&self) -> usize {
        self.session.page().len()
    }

    /// Decode and place an image fitted to the page; it becomes active.
    pub fn add_image(&mut self, bytes: &[u8]) -> Result<u32, JsValue> {
        self.session
            .add_image(bytes, AddOptions::default())
            .map_err(js_error)
            .and_then(raw_id)
    }

    /// Place an image at a fixed uniform scale, as the file picker does.
    pub fn add_image_scaled(&mut self, bytes: &[u8], scale: Option<f64>) -> Result<u32, JsValue> {
        let options = AddOptions {
            scale: Some(scale.unwrap_or(PICKER_SCALE)),
            ..AddOptions::default()
        };
        self.session
            .add_image(bytes, options)
            .map_err(js_error)
            .and_then(raw_id)
    }

    /// Place several files (`Uint8Array`s) in order. Undecodable files are
    /// skipped; the last placed image becomes active.
    pub fn add_images(&mut self, files: js_sys::Array) -> Result<Vec<u32>, JsValue> {
        let buffers: Vec<Vec<u8>> = files
            .iter()
            .map(|file| js_sys::Uint8Array::new(&file).to_vec())
            .collect();
        self.add_buffers(&buffers)
    }

    /// Start an asynchronous load. Decode in a worker, then pass the ticket
    /// and the decoded bitmap to `finish_load`.
    pub fn begin_load(&self) -> u64 {
        self.session.begin_load().as_raw()
    }

    /// Place a bitmap decoded since `begin_load`. Returns `undefined` when the
    /// editor was reloaded in between; fails once the editor is closed.
    pub fn finish_load(
        &mut self,
        ticket: u64,
        bitmap: &JsBitmap,
    ) -> Result<Option<u32>, JsValue> {
        self.session
            .finish_load_bitmap(
                LoadTicket::from_raw(ticket),
                bitmap.to_bitmap(),
                AddOptions::default(),
            )
            .map_err(js_error)?
            .map(raw_id)
            .transpose()
    }

    /// Select an object, or clear the selection with `undefined`.
    pub fn set_active(&mut self, id: Option<u32>) -> Result<(), JsValue> {
        self.session
            .set_active(id.map(|raw| ObjectId::from_raw(raw as u64)))
            .map_err(js_error)
    }

    /// The active object's id.
    #[wasm_bindgen(getter)]
    pub fn active(&self) -> Result<Option<u32>, JsValue> {
        self.session.page().active().map(raw_id).transpose()
    }

    pub fn rotate_active(&mut self, delta_degrees: f64) -> Result<(), JsValue> {
        self.session.rotate_active(delta_degrees).map_err(js_error)
    }

    /// Remove the active object; returns its id if one was removed.
    pub fn remove_active(&mut self) -> Result<Option<u32>, JsValue> {
        self.session
            .remove_active()
            .map_err(js_error)?
            .map(raw_id)
            .transpose()
    }

    /// Start cropping the active object; returns the pixels to crop.
    pub fn start_crop(&mut self) -> Result<JsBitmap, JsValue> {
        self.session
            .start_crop()
            .map(|crop| JsBitmap::from_bitmap(crop.source().clone()))
            .map_err(js_error)
    }

    /// Apply a crop rectangle in source pixel coordinates.
    pub fn apply_crop(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<u32, JsValue> {
        let rect = CropRect::new(
            x.round() as i64,
            y.round() as i64,
            width.round() as i64,
            height.round() as i64,
        );
        self.session
            .apply_crop(rect)
            .map_err(js_error)
            .and_then(raw_id)
    }

    /// Apply a crop rectangle in normalized (0.0 to 1.0) coordinates.
    pub fn apply_crop_normalized(
        &mut self,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Result<u32, JsValue> {
        let Some(crop) = self.session.crop_session() else {
            return Err(js_error("Invalid state: no crop in progress"));
        };
        let source = crop.source();
        let rect = CropRect::from_normalized(left, top, width, height, source.width, source.height);
        self.session
            .apply_crop(rect)
            .map_err(js_error)
            .and_then(raw_id)
    }

    /// Discard the pending crop; returns whether one was pending.
    pub fn cancel_crop(&mut self) -> bool {
        self.session.cancel_crop()
    }

    #[wasm_bindgen(getter)]
    pub fn is_cropping(&self) -> bool {
        self.session.crop_session().is_some()
    }

    /// Render at an arbitrary scale of the preview size.
    pub fn render(&self, scale: f64) -> Result<JsBitmap, JsValue> {
        printdesk_core::render(self.session.page(), scale)
            .map(JsBitmap::from_bitmap)
            .map_err(js_error)
    }

    /// Render at preview size.
    pub fn render_preview(&self) -> Result<JsBitmap, JsValue> {
        self.session
            .render_preview()
            .map(JsBitmap::from_bitmap)
            .map_err(js_error)
    }

    /// Render at print resolution and encode as PNG.
    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        let bitmap = self.session.render_export().map_err(js_error)?;
        printdesk_core::encode_png(&bitmap.pixels, bitmap.width, bitmap.height).map_err(js_error)
    }

    /// Render at print resolution and encode in the configured format.
    pub fn export(&self) -> Result<Vec<u8>, JsValue> {
        self.session.export_bytes().map_err(js_error)
    }

    /// Pixel-free summaries of every object, bottom to top.
    pub fn objects(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.summaries()).map_err(js_error)
    }

    /// Clear the page for a new set of files.
    pub fn reload(&mut self) -> Result<(), JsValue> {
        self.session.reload().map_err(js_error)
    }

    /// Close the editor; later mutations fail.
    pub fn close(&mut self) {
        self.session.close();
    }
}

impl JsEditor {
    fn add_buffers(&mut self, buffers: &[Vec<u8>]) -> Result<Vec<u32>, JsValue> {
        let ticket = self.session.begin_load();
        let placed = self
            .session
            .finish_batch(ticket, buffers)
            .map_err(js_error)?
            .unwrap_or_default();
        placed.into_iter().map(raw_id).collect()
    }

    fn summaries(&self) -> Vec<ObjectSummary> {
        self.session
            .page()
            .objects()
            .iter()
            .map(|obj| obj.summary())
            .collect()
    }
}

/// Ids cross into JavaScript as `u32`; one past that range is an error.
fn raw_id(id: ObjectId) -> Result<u32, JsValue> {
    u32::try_from(id.as_raw())
        .map_err(|_| js_error(format!("Object {id} has no JavaScript id")))
}
