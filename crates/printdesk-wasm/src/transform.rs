//! WASM bindings for crop geometry and rotation arithmetic used by the
//! crop dialog and the selection overlay.

use crate::types::{js_error, JsBitmap};
use printdesk_core::transform::{
    compute_rotated_bounds, crop_bitmap as core_crop, normalize_angle as core_normalize, CropRect,
};
use wasm_bindgen::prelude::*;

/// Crop a bitmap with normalized coordinates (0.0 to 1.0).
///
/// Coordinates are clamped to the bitmap, so the result is at least 1x1.
#[wasm_bindgen]
pub fn crop_bitmap(
    image: &JsBitmap,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
) -> Result<JsBitmap, JsValue> {
    let src = image.to_bitmap();
    let rect = CropRect::from_normalized(left, top, width, height, src.width, src.height);
    core_crop(&src, rect)
        .map(JsBitmap::from_bitmap)
        .map_err(js_error)
}

/// Axis-aligned `[width, height]` of a `width x height` box rotated by
/// `angle_degrees`.
#[wasm_bindgen]
pub fn rotated_bounds(width: f64, height: f64, angle_degrees: f64) -> Vec<f64> {
    let (w, h) = compute_rotated_bounds(width, height, angle_degrees);
    vec![w, h]
}

/// Normalize an angle into `[0, 360)`.
#[wasm_bindgen]
pub fn normalize_angle(degrees: f64) -> f64 {
    core_normalize(degrees)
}
