//! The narrow capability interface between the page engine and a drawing
//! library: load a bitmap from bytes, draw a bitmap with a transform, and
//! rasterize to bytes.

use crate::decode::{Bitmap, DecodeError};
use crate::encode::{EncodeError, ExportFormat};

use super::RenderError;

/// Placement of one bitmap on an output surface, in output pixels.
///
/// The bitmap is drawn centered on `center`, rotated by `angle_degrees`
/// (clockwise, y down), and scaled by `scale_x`/`scale_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTransform {
    pub center_x: f64,
    pub center_y: f64,
    pub angle_degrees: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// A drawing target produced by a [`RasterBackend`].
pub trait Surface {
    /// Composite `bitmap` over the surface with source-over blending.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, transform: &DrawTransform)
        -> Result<(), RenderError>;

    /// Read the surface back as a straight-alpha bitmap.
    fn finish(self) -> Bitmap;
}

/// A decode/draw/encode implementation the renderer can run on.
pub trait RasterBackend {
    type Surface: Surface;

    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, DecodeError>;

    /// Allocate a `width x height` surface filled with `background`.
    fn create_surface(
        &self,
        width: u32,
        height: u32,
        background: [u8; 4],
    ) -> Result<Self::Surface, RenderError>;

    fn encode(&self, bitmap: &Bitmap, format: ExportFormat) -> Result<Vec<u8>, EncodeError>;
}
