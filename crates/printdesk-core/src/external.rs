//! Seams for collaborators the engine does not implement itself: PDF page
//! rasterization and the export/print destination.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::decode::Bitmap;
use crate::encode::{encode_png, EncodeError};
use crate::error::Result;
use crate::page::{AddOptions, ObjectId, Page};

/// Zoom the document view rasterizes PDF pages at.
pub const DEFAULT_PDF_SCALE: f64 = 1.25;

/// Failures reported by an external collaborator.
#[derive(Debug, Error)]
pub enum ExternalError {
    #[error("PDF rasterization failed: {0}")]
    Pdf(String),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The collaborator does not offer this capability.
    #[error("Unsupported: {0}")]
    Unsupported(&'static str),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Renders single pages of a PDF document into bitmaps.
pub trait PdfRasterizer {
    /// Rasterize 1-based `page_number` of `pdf` at `scale` (1.0 = 72 dpi).
    fn rasterize_page(
        &self,
        pdf: &[u8],
        page_number: u32,
        scale: f64,
    ) -> std::result::Result<Bitmap, ExternalError>;
}

/// Destination for a finished export.
pub trait ExportSurface {
    /// Persist `bitmap` under `filename`. Returns where it ended up.
    fn save(&mut self, bitmap: &Bitmap, filename: &str) -> std::result::Result<String, ExternalError>;

    /// Hand `bitmap` to the platform print pipeline.
    fn print(&mut self, bitmap: &Bitmap) -> std::result::Result<(), ExternalError>;

    /// Names of the printers `print` can reach. Empty when the surface has
    /// no printer list.
    fn printers(&self) -> std::result::Result<Vec<String>, ExternalError> {
        Ok(Vec::new())
    }
}

/// Rasterize one PDF page and place it on `page` like any other image.
pub fn place_pdf_page<R: PdfRasterizer + ?Sized>(
    page: &mut Page,
    rasterizer: &R,
    pdf: &[u8],
    page_number: u32,
    scale: f64,
    options: AddOptions,
) -> Result<ObjectId> {
    let bitmap = rasterizer.rasterize_page(pdf, page_number, scale)?;
    log::debug!(
        "rasterized pdf page {} at {:.2} -> {}x{}",
        page_number,
        scale,
        bitmap.width,
        bitmap.height
    );
    page.add_bitmap(bitmap, options)
}

/// Writes exports as PNG files into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSurface for DirectoryExporter {
    fn save(&mut self, bitmap: &Bitmap, filename: &str) -> std::result::Result<String, ExternalError> {
        // Only the final component is honored; exports never leave `dir`.
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| ExternalError::Io {
                path: filename.to_string(),
                message: "not a file name".to_string(),
            })?;
        let path = self.dir.join(name);

        let png = encode_png(&bitmap.pixels, bitmap.width, bitmap.height)?;
        fs::write(&path, png).map_err(|e| ExternalError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let saved = path.display().to_string();
        log::info!("exported {}x{} to {}", bitmap.width, bitmap.height, saved);
        Ok(saved)
    }

    fn print(&mut self, _bitmap: &Bitmap) -> std::result::Result<(), ExternalError> {
        Err(ExternalError::Unsupported("printing from a directory exporter"))
    }
}
