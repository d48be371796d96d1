//! The composition surface: a fixed-size virtual page holding placed images.
//!
//! A [`Page`] owns an ordered sequence of [`PlacedObject`]s. Sequence order
//! is z-order: index 0 is drawn first (bottom), the last object is drawn on
//! top. At most one object is active (selected) at a time.
//!
//! Transform operations on unknown ids are silent no-ops, so a toolbar action
//! racing a delete never fails. Operations that must produce a new object
//! (`replace_object`) report `ObjectNotFound` instead.

mod object;
mod paper;

use std::sync::Arc;

use crate::decode::Bitmap;
use crate::error::{EditorError, Result};
use crate::render::{RasterBackend, SkiaBackend};

pub use object::{AddOptions, Bounds, ObjectId, ObjectSummary, PlacedObject, Point};
pub use paper::PaperSize;

/// Fraction of each page dimension a newly fitted object may occupy.
pub const FIT_FRACTION: f64 = 0.9;

/// A virtual document with fixed preview dimensions and export scale.
#[derive(Debug, Clone)]
pub struct Page {
    width: f64,
    height: f64,
    export_scale: f64,
    objects: Vec<PlacedObject>,
    active: Option<ObjectId>,
    next_id: u64,
}

impl Page {
    /// Create an empty page.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::InvalidPage` unless all arguments are finite and
    /// strictly positive.
    pub fn new(preview_width: f64, preview_height: f64, export_scale: f64) -> Result<Self> {
        let valid = [preview_width, preview_height, export_scale]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !valid {
            return Err(EditorError::InvalidPage {
                width: preview_width,
                height: preview_height,
                export_scale,
            });
        }

        Ok(Self {
            width: preview_width,
            height: preview_height,
            export_scale,
            objects: Vec::new(),
            active: None,
            next_id: 1,
        })
    }

    /// Create a page whose aspect ratio and export scale match a paper size.
    pub fn for_paper(paper: PaperSize, preview_width: f64) -> Result<Self> {
        Self::new(
            preview_width,
            paper.preview_height(preview_width),
            paper.export_scale(preview_width),
        )
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Constant factor from preview space to export pixels.
    pub fn export_scale(&self) -> f64 {
        self.export_scale
    }

    /// Objects in z-order, bottom first.
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.z_index(id).is_some()
    }

    /// Position of the object in the z-order sequence.
    pub fn z_index(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn active(&self) -> Option<ObjectId> {
        self.active
    }

    pub fn active_object(&self) -> Option<&PlacedObject> {
        self.active.and_then(|id| self.object(id))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Bounding box of an object after its transform, in preview space.
    pub fn painted_bounds(&self, id: ObjectId) -> Option<Bounds> {
        self.object(id).map(PlacedObject::bounds)
    }

    /// Scale that fits a bitmap within 90% of the page without upscaling.
    pub fn fit_scale(&self, bitmap_width: u32, bitmap_height: u32) -> f64 {
        let bw = bitmap_width.max(1) as f64;
        let bh = bitmap_height.max(1) as f64;
        (FIT_FRACTION * self.width / bw)
            .min(FIT_FRACTION * self.height / bh)
            .min(1.0)
    }

    /// Decode image bytes and place the result on top of the page.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Decode` if the bytes are not a supported raster
    /// format. The page is unchanged on error.
    pub fn add_object(&mut self, bytes: &[u8], options: AddOptions) -> Result<ObjectId> {
        self.add_object_with(&SkiaBackend::default(), bytes, options)
    }

    /// [`Page::add_object`] decoding through `backend`.
    pub fn add_object_with<B: RasterBackend>(
        &mut self,
        backend: &B,
        bytes: &[u8],
        options: AddOptions,
    ) -> Result<ObjectId> {
        let bitmap = backend.decode(bytes)?;
        self.add_bitmap(bitmap, options)
    }

    /// Place an already decoded bitmap on top of the page.
    ///
    /// # Errors
    ///
    /// `EditorError::Decode` when the bitmap is empty or its pixel buffer does
    /// not match its dimensions.
    pub fn add_bitmap(&mut self, bitmap: Bitmap, options: AddOptions) -> Result<ObjectId> {
        bitmap.validate()?;

        let scale = match options.scale {
            Some(s) if s.is_finite() && s > 0.0 => s,
            _ => self.fit_scale(bitmap.width, bitmap.height),
        };
        let center = options
            .center
            .unwrap_or_else(|| Point::new(self.width / 2.0, self.height / 2.0));

        let id = self.allocate_id();
        log::debug!(
            "placing {} ({}x{}) at ({:.1}, {:.1}) scale {:.4}",
            id,
            bitmap.width,
            bitmap.height,
            center.x,
            center.y,
            scale
        );

        self.objects.push(PlacedObject::new(
            id,
            Arc::new(bitmap),
            center,
            options.angle,
            scale,
            scale,
        ));
        if options.activate {
            self.active = Some(id);
        }
        Ok(id)
    }

    /// Select an object, or clear the selection with `None`.
    ///
    /// An unknown id leaves the selection unchanged. Z-order is never affected.
    pub fn set_active(&mut self, id: Option<ObjectId>) {
        match id {
            None => self.active = None,
            Some(id) if self.contains(id) => self.active = Some(id),
            Some(id) => log::warn!("ignoring selection of unknown object {}", id),
        }
    }

    /// Rotate an object by `delta_degrees`; unknown ids are ignored.
    pub fn rotate(&mut self, id: ObjectId, delta_degrees: f64) {
        match self.objects.iter_mut().find(|o| o.id == id) {
            Some(obj) => {
                obj.angle = crate::transform::normalize_angle(obj.angle + delta_degrees);
                log::debug!("rotated {} to {:.1} degrees", id, obj.angle);
            }
            None => log::debug!("rotate ignored, {} not on page", id),
        }
    }

    /// Rotate the active object, if any.
    pub fn rotate_active(&mut self, delta_degrees: f64) {
        if let Some(id) = self.active {
            self.rotate(id, delta_degrees);
        }
    }

    /// Remove an object; returns it if it was present.
    ///
    /// Clears the selection when the active object is removed. Removing an
    /// unknown id is a no-op and leaves the order of the others untouched.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<PlacedObject> {
        let index = self.z_index(id)?;
        let removed = self.objects.remove(index);
        if self.active == Some(id) {
            self.active = None;
        }
        log::debug!("removed {} from z-index {}", id, index);
        Some(removed)
    }

    /// Remove the active object, if any.
    pub fn remove_active(&mut self) -> Option<PlacedObject> {
        self.active.and_then(|id| self.remove_object(id))
    }

    /// Replace an object's pixels with newly decoded bytes.
    ///
    /// The new object keeps the old one's position, angle, scale and z-index,
    /// gets a fresh id, and becomes active.
    ///
    /// # Errors
    ///
    /// `EditorError::ObjectNotFound` if `id` is not on the page,
    /// `EditorError::Decode` if the bytes are bad. The page is unchanged on error.
    pub fn replace_object(&mut self, id: ObjectId, bytes: &[u8]) -> Result<ObjectId> {
        self.replace_object_with(&SkiaBackend::default(), id, bytes)
    }

    /// [`Page::replace_object`] decoding through `backend`.
    pub fn replace_object_with<B: RasterBackend>(
        &mut self,
        backend: &B,
        id: ObjectId,
        bytes: &[u8],
    ) -> Result<ObjectId> {
        if !self.contains(id) {
            return Err(EditorError::ObjectNotFound(id));
        }
        let bitmap = backend.decode(bytes)?;
        self.replace_with_bitmap(id, bitmap)
    }

    /// Same as [`Page::replace_object`] for an already decoded bitmap.
    pub fn replace_with_bitmap(&mut self, id: ObjectId, bitmap: Bitmap) -> Result<ObjectId> {
        let index = self.z_index(id).ok_or(EditorError::ObjectNotFound(id))?;
        bitmap.validate()?;

        let new_id = self.allocate_id();
        let old = &self.objects[index];
        let replacement = PlacedObject::new(
            new_id,
            Arc::new(bitmap),
            old.center,
            old.angle,
            old.scale_x,
            old.scale_y,
        );

        self.objects[index] = replacement;
        self.active = Some(new_id);
        log::debug!("replaced {} with {} at z-index {}", id, new_id, index);
        Ok(new_id)
    }

    /// Remove every object and clear the selection.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.active = None;
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }
}
