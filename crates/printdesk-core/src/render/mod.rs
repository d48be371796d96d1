//! Page rasterization for preview, export and print.
//!
//! [`render`] flattens a page's objects onto an opaque white bitmap of
//! `round(width * scale) x round(height * scale)` pixels. Objects are drawn
//! back to front; each is translated to its scaled center, rotated by its
//! angle, scaled by its own scale times the output scale, and drawn centered
//! on that local origin.
//!
//! Rendering reads the page only and is deterministic: the same page state
//! and scale always produce the same pixels.

mod backend;
mod skia;

use thiserror::Error;

use crate::decode::Bitmap;
use crate::page::Page;

pub use backend::{DrawTransform, RasterBackend, Surface};
pub use skia::{FilterType, SkiaBackend, SkiaSurface};

/// Paper color under every page.
pub const BACKGROUND: [u8; 4] = [255, 255, 255, 255];

/// Errors that can occur while rasterizing a page.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Output scale is zero, negative or not finite.
    #[error("Invalid output scale: {0}")]
    InvalidScale(f64),

    /// The requested surface is empty or too large to allocate.
    #[error("Cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    /// A bitmap's pixel buffer does not match its dimensions.
    #[error("Malformed {width}x{height} bitmap with {len} bytes")]
    MalformedBitmap { width: u32, height: u32, len: usize },
}

/// Output dimensions of `page` rendered at `output_scale`.
pub fn output_dimensions(page: &Page, output_scale: f64) -> Result<(u32, u32), RenderError> {
    if !output_scale.is_finite() || output_scale <= 0.0 {
        return Err(RenderError::InvalidScale(output_scale));
    }
    let width = (page.width() * output_scale).round();
    let height = (page.height() * output_scale).round();
    if width < 1.0 || height < 1.0 || width > u32::MAX as f64 || height > u32::MAX as f64 {
        return Err(RenderError::SurfaceAllocation {
            width: width as u32,
            height: height as u32,
        });
    }
    Ok((width as u32, height as u32))
}

/// Rasterize a page with the default tiny-skia backend.
pub fn render(page: &Page, output_scale: f64) -> Result<Bitmap, RenderError> {
    render_with(&SkiaBackend::default(), page, output_scale)
}

/// Rasterize a page at its export scale (print resolution).
pub fn render_export(page: &Page) -> Result<Bitmap, RenderError> {
    render(page, page.export_scale())
}

/// Rasterize a page at preview resolution.
pub fn render_preview(page: &Page) -> Result<Bitmap, RenderError> {
    render(page, 1.0)
}

/// Rasterize a page on any backend.
///
/// An empty page renders as a blank white bitmap.
pub fn render_with<B: RasterBackend>(
    backend: &B,
    page: &Page,
    output_scale: f64,
) -> Result<Bitmap, RenderError> {
    let (width, height) = output_dimensions(page, output_scale)?;
    let mut surface = backend.create_surface(width, height, BACKGROUND)?;

    for obj in page.objects() {
        let center = obj.center();
        let (scale_x, scale_y) = obj.scale();
        let transform = DrawTransform {
            center_x: center.x * output_scale,
            center_y: center.y * output_scale,
            angle_degrees: obj.angle(),
            scale_x: scale_x * output_scale,
            scale_y: scale_y * output_scale,
        };
        surface.draw_bitmap(obj.bitmap(), &transform)?;
    }

    log::debug!(
        "rendered {} objects at scale {:.4} into {}x{}",
        page.len(),
        output_scale,
        width,
        height
    );
    Ok(surface.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::page::{AddOptions, PaperSize, Point};

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn page(width: f64, height: f64) -> Page {
        Page::new(width, height, 2.0).unwrap()
    }

    /// Bounding box (min_x, min_y, max_x, max_y) of non-white pixels.
    fn painted_box(bitmap: &Bitmap) -> Option<(u32, u32, u32, u32)> {
        let mut found: Option<(u32, u32, u32, u32)> = None;
        for y in 0..bitmap.height {
            for x in 0..bitmap.width {
                if bitmap.pixel(x, y) != Some(WHITE) {
                    found = Some(match found {
                        None => (x, y, x, y),
                        Some((a, b, c, d)) => (a.min(x), b.min(y), c.max(x), d.max(y)),
                    });
                }
            }
        }
        found
    }

    #[test]
    fn test_output_dimensions_a4_export() {
        let page = Page::for_paper(PaperSize::A4, 900.0).unwrap();
        assert_eq!(
            output_dimensions(&page, page.export_scale()).unwrap(),
            (2480, 3508)
        );
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let page = page(10.0, 10.0);
        assert!(matches!(render(&page, 0.0), Err(RenderError::InvalidScale(_))));
        assert!(matches!(render(&page, -1.0), Err(RenderError::InvalidScale(_))));
        assert!(matches!(
            render(&page, f64::NAN),
            Err(RenderError::InvalidScale(_))
        ));
    }

    #[test]
    fn test_scale_rounding_to_zero_rejected() {
        let page = page(10.0, 10.0);
        assert!(matches!(
            render(&page, 0.01),
            Err(RenderError::SurfaceAllocation { .. })
        ));
    }

    #[test]
    fn test_empty_page_renders_white() {
        let page = page(20.0, 30.0);
        let bitmap = render(&page, 1.5).unwrap();

        assert_eq!((bitmap.width, bitmap.height), (30, 45));
        assert!(bitmap.pixels.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_sole_object_within_fit_region() {
        let mut page = page(100.0, 140.0);
        page.add_bitmap(Bitmap::filled(400, 200, RED), AddOptions::default())
            .unwrap();

        let bitmap = render(&page, 1.0).unwrap();
        let (x0, y0, x1, y1) = painted_box(&bitmap).unwrap();

        // Anti-aliased edges may touch one extra pixel on each side
        assert!((x1 - x0 + 1) as f64 <= 0.9 * 100.0 + 2.0);
        assert!((y1 - y0 + 1) as f64 <= 0.9 * 140.0 + 2.0);
        assert_eq!(bitmap.pixel(50, 70), Some(RED));
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut page = page(80.0, 60.0);
        page.add_bitmap(Bitmap::filled(30, 10, RED), AddOptions::default())
            .unwrap();
        let id = page
            .add_bitmap(Bitmap::filled(10, 30, BLUE), AddOptions::default())
            .unwrap();
        page.rotate(id, 33.0);

        let first = render(&page, 2.0).unwrap();
        let second = render(&page, 2.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_does_not_mutate_page() {
        let mut page = page(50.0, 50.0);
        let id = page
            .add_bitmap(Bitmap::filled(10, 10, RED), AddOptions::default())
            .unwrap();
        let before = page.object(id).unwrap().summary();

        render(&page, 3.0).unwrap();
        assert_eq!(page.object(id).unwrap().summary(), before);
        assert_eq!(page.active(), Some(id));
    }

    #[test]
    fn test_later_objects_draw_on_top() {
        let mut page = page(40.0, 40.0);
        page.add_bitmap(Bitmap::filled(20, 20, RED), AddOptions::default())
            .unwrap();
        page.add_bitmap(Bitmap::filled(10, 10, BLUE), AddOptions::default())
            .unwrap();

        let bitmap = render(&page, 1.0).unwrap();
        assert_eq!(bitmap.pixel(20, 20), Some(BLUE));
        // Outside the blue square but inside the red one
        assert_eq!(bitmap.pixel(12, 12), Some(RED));
    }

    #[test]
    fn test_rotation_turns_wide_bar_upright() {
        let mut page = page(60.0, 60.0);
        let id = page
            .add_bitmap(Bitmap::filled(40, 6, RED), AddOptions::default())
            .unwrap();

        let flat = render(&page, 1.0).unwrap();
        assert_eq!(flat.pixel(45, 30), Some(RED));
        assert_eq!(flat.pixel(30, 15), Some(WHITE));

        page.rotate(id, 90.0);
        let upright = render(&page, 1.0).unwrap();
        assert_eq!(upright.pixel(45, 30), Some(WHITE));
        assert_eq!(upright.pixel(30, 15), Some(RED));
    }

    #[test]
    fn test_output_scale_scales_positions() {
        let mut page = page(20.0, 20.0);
        let options = AddOptions {
            center: Some(Point::new(5.0, 5.0)),
            scale: Some(1.0),
            ..AddOptions::default()
        };
        page.add_bitmap(Bitmap::filled(4, 4, RED), options).unwrap();

        let bitmap = render(&page, 2.0).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (40, 40));
        // Object spans 3..7 in preview space, 6..14 at 2x
        assert_eq!(painted_box(&bitmap), Some((6, 6, 13, 13)));
    }

    #[test]
    fn test_translucent_object_blends_with_paper() {
        let mut page = page(10.0, 10.0);
        page.add_bitmap(
            Bitmap::filled(10, 10, [0, 0, 0, 128]),
            AddOptions {
                scale: Some(1.0),
                ..AddOptions::default()
            },
        )
        .unwrap();

        let px = render(&page, 1.0).unwrap().pixel(5, 5).unwrap();
        assert_eq!(px[3], 255);
        assert!(px[0] > 100 && px[0] < 155, "blended value was {}", px[0]);
    }

    /// Records draw calls instead of rasterizing.
    #[derive(Default)]
    struct RecordingBackend {
        draws: Rc<RefCell<Vec<DrawTransform>>>,
    }

    struct RecordingSurface {
        width: u32,
        height: u32,
        draws: Rc<RefCell<Vec<DrawTransform>>>,
    }

    impl Surface for RecordingSurface {
        fn draw_bitmap(
            &mut self,
            _bitmap: &Bitmap,
            transform: &DrawTransform,
        ) -> Result<(), RenderError> {
            self.draws.borrow_mut().push(*transform);
            Ok(())
        }

        fn finish(self) -> Bitmap {
            Bitmap::filled(self.width, self.height, WHITE)
        }
    }

    impl RasterBackend for RecordingBackend {
        type Surface = RecordingSurface;

        fn decode(&self, bytes: &[u8]) -> Result<Bitmap, crate::decode::DecodeError> {
            crate::decode::decode_image(bytes)
        }

        fn create_surface(
            &self,
            width: u32,
            height: u32,
            _background: [u8; 4],
        ) -> Result<RecordingSurface, RenderError> {
            Ok(RecordingSurface {
                width,
                height,
                draws: Rc::clone(&self.draws),
            })
        }

        fn encode(
            &self,
            bitmap: &Bitmap,
            format: crate::encode::ExportFormat,
        ) -> Result<Vec<u8>, crate::encode::EncodeError> {
            crate::encode::encode(bitmap, format)
        }
    }

    #[test]
    fn test_render_with_custom_backend() {
        let mut page = page(20.0, 10.0);
        page.add_bitmap(Bitmap::filled(4, 4, RED), AddOptions::default())
            .unwrap();
        let top = page
            .add_bitmap(Bitmap::filled(2, 2, BLUE), AddOptions::default())
            .unwrap();
        page.rotate(top, 30.0);

        let backend = RecordingBackend::default();
        let out = render_with(&backend, &page, 2.0).unwrap();
        assert_eq!((out.width, out.height), (40, 20));

        let draws = backend.draws.borrow();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].angle_degrees, 0.0);
        assert_eq!(draws[1].angle_degrees, 30.0);
        assert_eq!((draws[1].center_x, draws[1].center_y), (20.0, 10.0));
        assert_eq!(draws[1].scale_x, 2.0);
    }

    #[test]
    fn test_render_export_uses_page_scale() {
        let page = page(10.0, 15.0);
        let bitmap = render_export(&page).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (20, 30));

        let preview = render_preview(&page).unwrap();
        assert_eq!((preview.width, preview.height), (10, 15));
    }
}
