//! Placed image objects and their placement options.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::decode::Bitmap;
use crate::transform::{compute_rotated_bounds, normalize_angle};

/// Identifier of a placed object, unique within its page and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Rebuild an id from its raw value (e.g. one passed through JavaScript).
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point in preview space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in preview space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// How a new object is placed on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddOptions {
    /// Center position; `None` centers the object on the page.
    pub center: Option<Point>,
    /// Uniform scale; `None` fits the object within 90% of the page.
    pub scale: Option<f64>,
    /// Initial rotation in degrees.
    pub angle: f64,
    /// Whether the new object becomes the active selection.
    pub activate: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            center: None,
            scale: None,
            angle: 0.0,
            activate: true,
        }
    }
}

impl AddOptions {
    /// Place without changing the current selection.
    pub fn inactive() -> Self {
        Self {
            activate: false,
            ..Self::default()
        }
    }
}

/// One image instance on a page.
///
/// The bitmap is reference counted so a crop session can hold the pixel
/// source without copying it; the object never mutates its pixels in place.
#[derive(Debug, Clone)]
pub struct PlacedObject {
    pub(crate) id: ObjectId,
    pub(crate) bitmap: Arc<Bitmap>,
    pub(crate) center: Point,
    pub(crate) angle: f64,
    pub(crate) scale_x: f64,
    pub(crate) scale_y: f64,
}

impl PlacedObject {
    pub(crate) fn new(
        id: ObjectId,
        bitmap: Arc<Bitmap>,
        center: Point,
        angle: f64,
        scale_x: f64,
        scale_y: f64,
    ) -> Self {
        Self {
            id,
            bitmap,
            center,
            angle: normalize_angle(angle),
            scale_x,
            scale_y,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn bitmap(&self) -> &Arc<Bitmap> {
        &self.bitmap
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Rotation in degrees, always in `[0, 360)`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Images are always selectable.
    pub fn selectable(&self) -> bool {
        true
    }

    /// Size of the scaled, unrotated object in preview space.
    pub fn painted_size(&self) -> (f64, f64) {
        (
            self.bitmap.width as f64 * self.scale_x,
            self.bitmap.height as f64 * self.scale_y,
        )
    }

    /// Axis-aligned box enclosing the transformed object in preview space.
    pub fn bounds(&self) -> Bounds {
        let (w, h) = self.painted_size();
        let (bw, bh) = compute_rotated_bounds(w, h, self.angle);
        Bounds {
            left: self.center.x - bw / 2.0,
            top: self.center.y - bh / 2.0,
            width: bw,
            height: bh,
        }
    }

    /// Serializable view of the object without its pixels.
    pub fn summary(&self) -> ObjectSummary {
        ObjectSummary {
            id: self.id,
            source_width: self.bitmap.width,
            source_height: self.bitmap.height,
            center: self.center,
            angle: self.angle,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
        }
    }
}

/// Pixel-free description of a placed object, for UI layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub id: ObjectId,
    pub source_width: u32,
    pub source_height: u32,
    pub center: Point,
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}
