//! The crop protocol: `Idle -> Cropping -> Idle`.
//!
//! Starting a crop captures the selected object's current pixels. Applying a
//! rectangle crops those pixels, re-encodes them as PNG and swaps them into
//! the page with [`Page::replace_object`], so the object keeps its position,
//! angle and scale. Cancelling discards the session without touching the page.
//!
//! Only one crop may be pending at a time; a second `start` is rejected with
//! `EditorError::InvalidState` until the first is applied or cancelled.

use std::sync::Arc;

use crate::decode::Bitmap;
use crate::encode::ExportFormat;
use crate::error::{EditorError, Result};
use crate::page::{ObjectId, Page};
use crate::render::{RasterBackend, SkiaBackend};
use crate::transform::{crop_bitmap, CropRect};

/// A pending crop of one placed object.
#[derive(Debug, Clone)]
pub struct CropSession {
    object_id: ObjectId,
    source: Arc<Bitmap>,
}

impl CropSession {
    /// The object being cropped.
    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    /// The pixels the crop rectangle refers to.
    pub fn source(&self) -> &Bitmap {
        &self.source
    }

    /// Rectangle selecting the whole source, the crop UI's initial state.
    pub fn initial_rect(&self) -> CropRect {
        CropRect::full(&self.source)
    }
}

/// Crop state machine, held next to a page but not part of it.
#[derive(Debug, Default)]
pub struct Cropper {
    session: Option<CropSession>,
}

impl Cropper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cropping(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&CropSession> {
        self.session.as_ref()
    }

    /// Begin cropping `object_id` (typically the page's active object).
    ///
    /// # Errors
    ///
    /// `EditorError::InvalidState` when no object is given, the object is not
    /// on the page, or another crop is already pending.
    pub fn start(&mut self, page: &Page, object_id: Option<ObjectId>) -> Result<&CropSession> {
        if self.session.is_some() {
            log::warn!("crop start rejected, a crop is already pending");
            return Err(EditorError::InvalidState("a crop is already in progress"));
        }
        let id = object_id.ok_or(EditorError::InvalidState("select an image to crop"))?;
        let object = page
            .object(id)
            .ok_or(EditorError::InvalidState("select an image to crop"))?;

        log::debug!(
            "cropping {} ({}x{})",
            id,
            object.bitmap().width,
            object.bitmap().height
        );
        Ok(self.session.insert(CropSession {
            object_id: id,
            source: Arc::clone(object.bitmap()),
        }))
    }

    /// Apply `rect`, given in the crop source's pixel coordinates.
    ///
    /// Returns the id of the replacement object, which is now active.
    ///
    /// # Errors
    ///
    /// - `EditorError::InvalidState` when no crop is pending.
    /// - `EditorError::InvalidCropRegion` when `rect` is degenerate or leaves
    ///   the source; the session stays open so the user can retry.
    /// - `EditorError::ObjectNotFound` when the object was removed while the
    ///   crop was pending; the session is closed and the page untouched.
    pub fn apply(&mut self, page: &mut Page, rect: CropRect) -> Result<ObjectId> {
        self.apply_with(&SkiaBackend::default(), page, rect)
    }

    /// [`Cropper::apply`] encoding and decoding the cropped pixels through
    /// `backend`.
    pub fn apply_with<B: RasterBackend>(
        &mut self,
        backend: &B,
        page: &mut Page,
        rect: CropRect,
    ) -> Result<ObjectId> {
        let session = self
            .session
            .as_ref()
            .ok_or(EditorError::InvalidState("no crop in progress"))?;

        let cropped = crop_bitmap(&session.source, rect)?;

        let id = session.object_id;
        if !page.contains(id) {
            self.session = None;
            log::warn!("crop target {} vanished before apply", id);
            return Err(EditorError::ObjectNotFound(id));
        }

        let png = backend.encode(&cropped, ExportFormat::Png)?;
        let new_id = page.replace_object_with(backend, id, &png)?;
        self.session = None;
        log::debug!("applied crop {} to {}, now {}", rect, id, new_id);
        Ok(new_id)
    }

    /// Discard the pending crop. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }
}
