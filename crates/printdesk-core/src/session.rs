//! An editor session: one page, its crop state and the liveness rules for
//! asynchronous loads.
//!
//! Decoding is slow relative to user input, so hosts decode off the UI path:
//! call [`EditorSession::begin_load`], decode with [`crate::decode_image`]
//! wherever convenient (a worker, another thread), and hand the bitmap to
//! [`EditorSession::finish_load_bitmap`] with the returned ticket. If the
//! session was reloaded in the meantime the ticket is stale and the result is
//! dropped without touching the page. [`EditorSession::finish_load`] does the
//! decode and the placement in one call for hosts without a worker.

use crate::config::EditorConfig;
use crate::crop::{CropSession, Cropper};
use crate::decode::Bitmap;
use crate::error::{EditorError, Result};
use crate::external::{place_pdf_page, ExportSurface, PdfRasterizer};
use crate::page::{AddOptions, ObjectId, Page};
use crate::render::{render_with, RasterBackend, SkiaBackend};
use crate::transform::CropRect;

/// Proof that a load was started in a particular session epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
}

impl LoadTicket {
    /// The ticket as a plain number, for hosts that pass it across a
    /// message boundary.
    pub fn as_raw(self) -> u64 {
        self.epoch
    }

    pub fn from_raw(raw: u64) -> Self {
        Self { epoch: raw }
    }
}

/// Owns a page exclusively and serializes every mutation of it.
///
/// Decoding, rendering and encoding all run on `B`.
#[derive(Debug)]
pub struct EditorSession<B = SkiaBackend> {
    config: EditorConfig,
    page: Page,
    cropper: Cropper,
    backend: B,
    epoch: u64,
    closed: bool,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Result<Self> {
        Self::with_backend(config, SkiaBackend::default())
    }
}

impl<B: RasterBackend> EditorSession<B> {
    pub fn with_backend(config: EditorConfig, backend: B) -> Result<Self> {
        let page = config.page()?;
        log::debug!(
            "session opened on {:?} page {}x{}",
            config.paper,
            page.width(),
            page.height()
        );
        Ok(Self {
            config,
            page,
            cropper: Cropper::new(),
            backend,
            epoch: 0,
            closed: false,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn crop_session(&self) -> Option<&CropSession> {
        self.cropper.session()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Mark the start of an asynchronous load.
    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket { epoch: self.epoch }
    }

    /// Whether a load started with `ticket` may still be applied.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        !self.closed && ticket.epoch == self.epoch
    }

    /// Place a bitmap decoded elsewhere, unless the ticket went stale.
    ///
    /// # Errors
    ///
    /// `EditorError::SessionClosed` once the session is closed. A ticket made
    /// stale by [`EditorSession::reload`] yields `Ok(None)` instead.
    pub fn finish_load_bitmap(
        &mut self,
        ticket: LoadTicket,
        bitmap: Bitmap,
        options: AddOptions,
    ) -> Result<Option<ObjectId>> {
        self.ensure_open()?;
        if !self.is_current(ticket) {
            log::warn!("dropping stale load from epoch {}", ticket.epoch);
            return Ok(None);
        }
        self.page.add_bitmap(bitmap, options).map(Some)
    }

    /// Decode `bytes` and place them, unless the ticket went stale.
    ///
    /// Returns `Ok(None)` for a stale ticket without decoding. Decode failures
    /// are reported only for current tickets.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        bytes: &[u8],
        options: AddOptions,
    ) -> Result<Option<ObjectId>> {
        self.ensure_open()?;
        if !self.is_current(ticket) {
            log::warn!("dropping stale load from epoch {}", ticket.epoch);
            return Ok(None);
        }
        let bitmap = self.backend.decode(bytes)?;
        self.finish_load_bitmap(ticket, bitmap, options)
    }

    /// Place a batch of bitmaps decoded elsewhere, in order. The last one
    /// becomes active.
    ///
    /// Bitmaps the page rejects are skipped with a warning. Returns
    /// `Ok(None)` for a stale ticket and `SessionClosed` once closed.
    pub fn finish_batch_bitmaps(
        &mut self,
        ticket: LoadTicket,
        bitmaps: Vec<Bitmap>,
    ) -> Result<Option<Vec<ObjectId>>> {
        self.ensure_open()?;
        if !self.is_current(ticket) {
            log::warn!(
                "dropping stale batch of {} from epoch {}",
                bitmaps.len(),
                ticket.epoch
            );
            return Ok(None);
        }

        let mut placed = Vec::with_capacity(bitmaps.len());
        for (index, bitmap) in bitmaps.into_iter().enumerate() {
            match self.page.add_bitmap(bitmap, AddOptions::inactive()) {
                Ok(id) => placed.push(id),
                Err(err) => log::warn!("skipping file {} of batch: {}", index, err),
            }
        }
        if let Some(&last) = placed.last() {
            self.page.set_active(Some(last));
        }
        Ok(Some(placed))
    }

    /// Decode and place a batch of files in order; the last placed one
    /// becomes active.
    ///
    /// Files that fail to decode are skipped with a warning so one bad file
    /// does not discard the rest. Returns `Ok(None)` for a stale ticket and
    /// `SessionClosed` once closed.
    pub fn finish_batch<F: AsRef<[u8]>>(
        &mut self,
        ticket: LoadTicket,
        files: &[F],
    ) -> Result<Option<Vec<ObjectId>>> {
        self.ensure_open()?;
        if !self.is_current(ticket) {
            log::warn!(
                "dropping stale batch of {} from epoch {}",
                files.len(),
                ticket.epoch
            );
            return Ok(None);
        }

        let mut bitmaps = Vec::with_capacity(files.len());
        for (index, bytes) in files.iter().enumerate() {
            match self.backend.decode(bytes.as_ref()) {
                Ok(bitmap) => bitmaps.push(bitmap),
                Err(err) => log::warn!("skipping file {} of batch: {}", index, err),
            }
        }
        self.finish_batch_bitmaps(ticket, bitmaps)
    }

    /// Decode and place synchronously.
    pub fn add_image(&mut self, bytes: &[u8], options: AddOptions) -> Result<ObjectId> {
        self.ensure_open()?;
        self.page.add_object_with(&self.backend, bytes, options)
    }

    pub fn add_bitmap(&mut self, bitmap: Bitmap, options: AddOptions) -> Result<ObjectId> {
        self.ensure_open()?;
        self.page.add_bitmap(bitmap, options)
    }

    pub fn add_pdf_page<R: PdfRasterizer + ?Sized>(
        &mut self,
        rasterizer: &R,
        pdf: &[u8],
        page_number: u32,
        scale: f64,
        options: AddOptions,
    ) -> Result<ObjectId> {
        self.ensure_open()?;
        place_pdf_page(&mut self.page, rasterizer, pdf, page_number, scale, options)
    }

    pub fn set_active(&mut self, id: Option<ObjectId>) -> Result<()> {
        self.ensure_open()?;
        self.page.set_active(id);
        Ok(())
    }

    pub fn rotate_active(&mut self, delta_degrees: f64) -> Result<()> {
        self.ensure_open()?;
        self.page.rotate_active(delta_degrees);
        Ok(())
    }

    /// Remove the active object; returns its id if there was one.
    pub fn remove_active(&mut self) -> Result<Option<ObjectId>> {
        self.ensure_open()?;
        Ok(self.page.remove_active().map(|obj| obj.id()))
    }

    /// Start cropping the active object.
    pub fn start_crop(&mut self) -> Result<&CropSession> {
        self.ensure_open()?;
        self.cropper.start(&self.page, self.page.active())
    }

    pub fn apply_crop(&mut self, rect: CropRect) -> Result<ObjectId> {
        self.ensure_open()?;
        self.cropper.apply_with(&self.backend, &mut self.page, rect)
    }

    pub fn cancel_crop(&mut self) -> bool {
        self.cropper.cancel()
    }

    pub fn render_preview(&self) -> Result<Bitmap> {
        Ok(render_with(&self.backend, &self.page, 1.0)?)
    }

    pub fn render_export(&self) -> Result<Bitmap> {
        Ok(render_with(
            &self.backend,
            &self.page,
            self.page.export_scale(),
        )?)
    }

    /// Render at export scale and encode with the configured format.
    pub fn export_bytes(&self) -> Result<Vec<u8>> {
        let bitmap = self.render_export()?;
        Ok(self.backend.encode(&bitmap, self.config.export_format)?)
    }

    /// Render at export scale and save through `surface`.
    pub fn export<S: ExportSurface + ?Sized>(&self, surface: &mut S, filename: &str) -> Result<String> {
        let bitmap = self.render_export()?;
        let saved = surface.save(&bitmap, filename)?;
        log::info!("exported page with {} objects to {}", self.page.len(), saved);
        Ok(saved)
    }

    /// Render at export scale and send to the printer.
    pub fn print<S: ExportSurface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        let bitmap = self.render_export()?;
        surface.print(&bitmap)?;
        log::info!("printed {}x{} page", bitmap.width, bitmap.height);
        Ok(())
    }

    /// Printers reachable through `surface`.
    pub fn printers<S: ExportSurface + ?Sized>(&self, surface: &S) -> Result<Vec<String>> {
        Ok(surface.printers()?)
    }

    /// Start over with an empty page. Loads begun before now are dropped.
    pub fn reload(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.epoch += 1;
        self.cropper.cancel();
        self.page.clear();
        log::debug!("session reloaded, epoch {}", self.epoch);
        Ok(())
    }

    /// End the session. Further mutations fail with `SessionClosed`.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.epoch += 1;
            self.cropper.cancel();
            log::debug!("session closed");
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(EditorError::SessionClosed)
        } else {
            Ok(())
        }
    }
}
