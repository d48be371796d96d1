//! Geometry helpers for placed objects: rotation arithmetic and cropping.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop rectangles are in the source bitmap's pixel coordinates
//! - Origin is top-left corner

mod crop;
mod rotation;

pub use crop::{crop_bitmap, CropError, CropRect, InvalidCropRegion};
pub use rotation::{compute_rotated_bounds, normalize_angle};
