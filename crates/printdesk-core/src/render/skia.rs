//! tiny-skia implementation of the raster backend.

use serde::{Deserialize, Serialize};
use tiny_skia::{Color, ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform};

use super::backend::{DrawTransform, RasterBackend, Surface};
use super::RenderError;
use crate::decode::{decode_image, Bitmap, DecodeError, BYTES_PER_PIXEL};
use crate::encode::{encode, EncodeError, ExportFormat};

/// Sampling filter used when drawing scaled or rotated bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor (fastest, blocky when scaled).
    Nearest,
    /// Bilinear (good balance for previews and print).
    #[default]
    Bilinear,
    /// Bicubic (smoothest downscaling).
    Bicubic,
}

impl FilterType {
    /// Convert to tiny-skia's filter quality.
    pub fn to_skia_quality(self) -> FilterQuality {
        match self {
            FilterType::Nearest => FilterQuality::Nearest,
            FilterType::Bilinear => FilterQuality::Bilinear,
            FilterType::Bicubic => FilterQuality::Bicubic,
        }
    }
}

/// Software rasterizer backed by tiny-skia.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkiaBackend {
    pub filter: FilterType,
}

impl SkiaBackend {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl RasterBackend for SkiaBackend {
    type Surface = SkiaSurface;

    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, DecodeError> {
        decode_image(bytes)
    }

    fn create_surface(
        &self,
        width: u32,
        height: u32,
        background: [u8; 4],
    ) -> Result<SkiaSurface, RenderError> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation { width, height })?;
        let [r, g, b, a] = background;
        pixmap.fill(Color::from_rgba8(r, g, b, a));

        Ok(SkiaSurface {
            pixmap,
            quality: self.filter.to_skia_quality(),
        })
    }

    fn encode(&self, bitmap: &Bitmap, format: ExportFormat) -> Result<Vec<u8>, EncodeError> {
        encode(bitmap, format)
    }
}

/// A premultiplied RGBA surface.
pub struct SkiaSurface {
    pixmap: Pixmap,
    quality: FilterQuality,
}

impl Surface for SkiaSurface {
    fn draw_bitmap(
        &mut self,
        bitmap: &Bitmap,
        transform: &DrawTransform,
    ) -> Result<(), RenderError> {
        let source = to_pixmap(bitmap)?;

        let matrix = Transform::from_translate(transform.center_x as f32, transform.center_y as f32)
            .pre_concat(Transform::from_rotate(transform.angle_degrees as f32))
            .pre_concat(Transform::from_scale(
                transform.scale_x as f32,
                transform.scale_y as f32,
            ))
            .pre_concat(Transform::from_translate(
                -(bitmap.width as f32) / 2.0,
                -(bitmap.height as f32) / 2.0,
            ));

        let paint = PixmapPaint {
            quality: self.quality,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, matrix, None);
        Ok(())
    }

    fn finish(self) -> Bitmap {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut pixels = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Bitmap::new(width, height, pixels)
    }
}

/// Convert a straight-alpha bitmap into a premultiplied pixmap.
fn to_pixmap(bitmap: &Bitmap) -> Result<Pixmap, RenderError> {
    let mut pixmap = Pixmap::new(bitmap.width, bitmap.height).ok_or(
        RenderError::SurfaceAllocation {
            width: bitmap.width,
            height: bitmap.height,
        },
    )?;

    if bitmap.pixels.len() != pixmap.pixels().len() * BYTES_PER_PIXEL {
        return Err(RenderError::MalformedBitmap {
            width: bitmap.width,
            height: bitmap.height,
            len: bitmap.pixels.len(),
        });
    }

    for (dst, src) in pixmap
        .pixels_mut()
        .iter_mut()
        .zip(bitmap.pixels.chunks_exact(BYTES_PER_PIXEL))
    {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_at(x: f64, y: f64) -> DrawTransform {
        DrawTransform {
            center_x: x,
            center_y: y,
            angle_degrees: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_skia_quality(),
            FilterQuality::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_skia_quality(),
            FilterQuality::Bilinear
        ));
        assert!(matches!(
            FilterType::Bicubic.to_skia_quality(),
            FilterQuality::Bicubic
        ));
    }

    #[test]
    fn test_surface_background_fill() {
        let surface = SkiaBackend::default()
            .create_surface(4, 3, [255, 255, 255, 255])
            .unwrap();
        let bitmap = surface.finish();
        assert_eq!((bitmap.width, bitmap.height), (4, 3));
        assert!(bitmap.pixels.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_zero_sized_surface_fails() {
        let result = SkiaBackend::default().create_surface(0, 10, [0, 0, 0, 255]);
        assert!(matches!(
            result,
            Err(RenderError::SurfaceAllocation { width: 0, .. })
        ));
    }

    #[test]
    fn test_draw_opaque_bitmap_at_integer_offset() {
        let backend = SkiaBackend::new(FilterType::Nearest);
        let mut surface = backend.create_surface(10, 10, [255, 255, 255, 255]).unwrap();
        let red = Bitmap::filled(4, 4, [255, 0, 0, 255]);

        surface.draw_bitmap(&red, &identity_at(5.0, 5.0)).unwrap();
        let out = surface.finish();

        // Drawn over x, y in 3..7
        assert_eq!(out.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(out.pixel(6, 6), Some([255, 0, 0, 255]));
        assert_eq!(out.pixel(2, 2), Some([255, 255, 255, 255]));
        assert_eq!(out.pixel(7, 7), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_transparent_pixels_keep_background() {
        let backend = SkiaBackend::new(FilterType::Nearest);
        let mut surface = backend.create_surface(4, 4, [255, 255, 255, 255]).unwrap();
        let clear = Bitmap::filled(4, 4, [0, 0, 0, 0]);

        surface.draw_bitmap(&clear, &identity_at(2.0, 2.0)).unwrap();
        assert!(surface.finish().pixels.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_backend_encode_then_decode() {
        let backend = SkiaBackend::default();
        let bitmap = Bitmap::filled(5, 3, [12, 34, 56, 255]);

        let png = backend.encode(&bitmap, ExportFormat::Png).unwrap();
        assert_eq!(backend.decode(&png).unwrap(), bitmap);
        assert!(matches!(
            backend.decode(b"nope"),
            Err(DecodeError::InvalidFormat)
        ));
    }

    #[test]
    fn test_malformed_bitmap_rejected() {
        let backend = SkiaBackend::default();
        let mut surface = backend.create_surface(4, 4, [255, 255, 255, 255]).unwrap();
        let broken = Bitmap {
            width: 2,
            height: 2,
            pixels: vec![0; 3],
        };
        assert!(matches!(
            surface.draw_bitmap(&broken, &identity_at(2.0, 2.0)),
            Err(RenderError::MalformedBitmap { .. })
        ));
    }
}
