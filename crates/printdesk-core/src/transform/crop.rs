//! Pixel-space cropping.
//!
//! Crop rectangles are given in the source bitmap's own pixel coordinates.
//! Unlike a clamping crop, an out-of-bounds or degenerate rectangle is
//! rejected so the interactive crop UI can let the user retry.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left pixel
//! - `x + width` and `y + height` are exclusive edges

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{Bitmap, DecodeError, BYTES_PER_PIXEL};

/// A crop rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl CropRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering the whole bitmap.
    pub fn full(bitmap: &Bitmap) -> Self {
        Self::new(0, 0, bitmap.width as i64, bitmap.height as i64)
    }

    /// Build a pixel rectangle from normalized coordinates (0.0 to 1.0).
    ///
    /// Values are clamped to the source bounds and the result is at least
    /// 1x1, so the returned rectangle always validates against a source of
    /// the given size.
    pub fn from_normalized(
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        source_width: u32,
        source_height: u32,
    ) -> Self {
        let src_w = source_width as f64;
        let src_h = source_height as f64;

        let px_left = (left.clamp(0.0, 1.0) * src_w).round() as i64;
        let px_top = (top.clamp(0.0, 1.0) * src_h).round() as i64;
        let px_width = (width.clamp(0.0, 1.0) * src_w).round() as i64;
        let px_height = (height.clamp(0.0, 1.0) * src_h).round() as i64;

        let px_left = px_left.min(source_width as i64 - 1).max(0);
        let px_top = px_top.min(source_height as i64 - 1).max(0);
        let right = (px_left + px_width).min(source_width as i64);
        let bottom = (px_top + px_height).min(source_height as i64);

        Self::new(
            px_left,
            px_top,
            (right - px_left).max(1),
            (bottom - px_top).max(1),
        )
    }

    /// Check the rectangle lies fully inside a `source_width x source_height` bitmap
    /// and has a positive area.
    pub fn validate(&self, source_width: u32, source_height: u32) -> Result<(), InvalidCropRegion> {
        let fits = self.x >= 0
            && self.y >= 0
            && self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|r| r <= source_width as i64)
            && self.y.checked_add(self.height).is_some_and(|b| b <= source_height as i64);

        if fits {
            Ok(())
        } else {
            Err(InvalidCropRegion {
                rect: *self,
                source_width,
                source_height,
            })
        }
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

/// A crop rectangle that is degenerate or leaves the source bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Crop region {rect} does not fit inside the {source_width}x{source_height} source")]
pub struct InvalidCropRegion {
    pub rect: CropRect,
    pub source_width: u32,
    pub source_height: u32,
}

/// Errors from [`crop_bitmap`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CropError {
    #[error(transparent)]
    Region(#[from] InvalidCropRegion),

    /// The source bitmap itself is unusable.
    #[error(transparent)]
    Source(#[from] DecodeError),
}

/// Copy the pixels inside `rect` into a new bitmap.
///
/// # Errors
///
/// [`CropError::Source`] when `image` is empty or its pixel buffer does not
/// match its dimensions, [`CropError::Region`] unless `rect` has positive
/// size and lies entirely within `image`.
pub fn crop_bitmap(image: &Bitmap, rect: CropRect) -> Result<Bitmap, CropError> {
    image.validate()?;
    rect.validate(image.width, image.height)?;

    // Fast path: full crop returns a clone
    if rect == CropRect::full(image) {
        return Ok(image.clone());
    }

    let out_width = rect.width as u32;
    let out_height = rect.height as u32;
    let src_stride = image.width as usize * BYTES_PER_PIXEL;
    let row_bytes = out_width as usize * BYTES_PER_PIXEL;

    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    // Copy pixel data row by row
    for y in 0..out_height as usize {
        let start = (rect.y as usize + y) * src_stride + rect.x as usize * BYTES_PER_PIXEL;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    Ok(Bitmap::new(out_width, out_height, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> Bitmap {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Bitmap::new(width, height, pixels)
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(100, 100);
        let result = crop_bitmap(&img, CropRect::full(&img)).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_center_crop_pixel_values() {
        let img = test_image(10, 10);
        let result = crop_bitmap(&img, CropRect::new(2, 3, 6, 4)).unwrap();

        assert_eq!((result.width, result.height), (6, 4));
        // First pixel comes from (2, 3): 3 * 10 + 2 = 32
        assert_eq!(result.pixel(0, 0), Some([32, 32, 32, 255]));
        // Last pixel comes from (7, 6): 6 * 10 + 7 = 67
        assert_eq!(result.pixel(5, 3), Some([67, 67, 67, 255]));
    }

    #[test]
    fn test_crop_touching_far_edges() {
        let img = test_image(10, 8);
        let result = crop_bitmap(&img, CropRect::new(9, 7, 1, 1)).unwrap();
        assert_eq!(result.pixel(0, 0), Some([79, 79, 79, 255]));
    }

    #[test]
    fn test_negative_origin_rejected() {
        let img = test_image(100, 100);
        let err = crop_bitmap(&img, CropRect::new(-5, 0, 50, 50)).unwrap_err();
        let CropError::Region(err) = err else {
            panic!("expected a region error, got {err:?}");
        };
        assert_eq!(err.rect.x, -5);
        assert_eq!((err.source_width, err.source_height), (100, 100));
    }

    #[test]
    fn test_short_pixel_buffer_rejected() {
        let img = Bitmap {
            width: 10,
            height: 10,
            pixels: vec![0; 40],
        };
        assert!(matches!(
            crop_bitmap(&img, CropRect::new(2, 2, 6, 6)),
            Err(CropError::Source(DecodeError::MalformedPixels { len: 40, .. }))
        ));
        assert!(matches!(
            crop_bitmap(&img, CropRect::full(&img)),
            Err(CropError::Source(_))
        ));
    }

    #[test]
    fn test_empty_source_rejected() {
        let img = Bitmap::new(0, 0, Vec::new());
        assert!(matches!(
            crop_bitmap(&img, CropRect::new(0, 0, 1, 1)),
            Err(CropError::Source(DecodeError::EmptyImage { .. }))
        ));
    }

    #[test]
    fn test_oversized_region_rejected() {
        let img = test_image(100, 100);
        assert!(crop_bitmap(&img, CropRect::new(60, 0, 50, 10)).is_err());
        assert!(crop_bitmap(&img, CropRect::new(0, 0, 100, 101)).is_err());
    }

    #[test]
    fn test_degenerate_region_rejected() {
        let img = test_image(10, 10);
        assert!(crop_bitmap(&img, CropRect::new(0, 0, 0, 5)).is_err());
        assert!(crop_bitmap(&img, CropRect::new(0, 0, 5, -1)).is_err());
    }

    #[test]
    fn test_overflowing_rect_rejected() {
        let img = test_image(10, 10);
        assert!(crop_bitmap(&img, CropRect::new(i64::MAX, 0, 1, 1)).is_err());
        assert!(crop_bitmap(&img, CropRect::new(1, 0, i64::MAX, 1)).is_err());
    }

    #[test]
    fn test_from_normalized_center() {
        let rect = CropRect::from_normalized(0.25, 0.25, 0.5, 0.5, 100, 80);
        assert_eq!(rect, CropRect::new(25, 20, 50, 40));
    }

    #[test]
    fn test_from_normalized_clamps() {
        let rect = CropRect::from_normalized(-0.1, 0.9, 1.5, 0.5, 10, 10);
        assert_eq!(rect, CropRect::new(0, 9, 10, 1));
        assert!(rect.validate(10, 10).is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = CropRect::new(-5, 0, 10, 10).validate(20, 20).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Crop region 10x10 at (-5, 0) does not fit inside the 20x20 source"
        );
    }
}
