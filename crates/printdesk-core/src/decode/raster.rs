//! Raster image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{Bitmap, DecodeError, Orientation};

/// Formats a placed object may be decoded from.
const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Gif,
    ImageFormat::Bmp,
];

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// The format is guessed from the content, not from a file name. PNG, JPEG,
/// WebP, GIF (first frame) and BMP are accepted.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a supported format.
/// Returns `DecodeError::CorruptedFile` if the data is truncated or corrupted.
pub fn decode_image(bytes: &[u8]) -> Result<Bitmap, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    into_bitmap(apply_orientation(img, orientation))
}

/// Decode an image from bytes without applying EXIF orientation.
///
/// Pixels come back in stored order. Use this when the caller reads the
/// orientation with [`get_orientation`] and applies it itself.
pub fn decode_image_no_orientation(bytes: &[u8]) -> Result<Bitmap, DecodeError> {
    into_bitmap(decode_dynamic(bytes)?)
}

/// Check whether the bytes look like a format `decode_image` accepts.
///
/// Only the header is sniffed; a `true` result does not guarantee the
/// file decodes cleanly.
pub fn is_supported_image(bytes: &[u8]) -> bool {
    image::guess_format(bytes)
        .map(|format| SUPPORTED_FORMATS.contains(&format))
        .unwrap_or(false)
}

/// Extract EXIF orientation value from image bytes (for external use).
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    match reader.format() {
        Some(format) if SUPPORTED_FORMATS.contains(&format) => {}
        _ => return Err(DecodeError::InvalidFormat),
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn into_bitmap(img: DynamicImage) -> Result<Bitmap, DecodeError> {
    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }
    Ok(Bitmap::from_rgba_image(rgba))
}

/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 40) as u8, (y * 40) as u8, 128])
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, format)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let bytes = encoded(3, 2, ImageFormat::Png);
        let img = decode_image(&bytes).unwrap();

        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.pixels.len(), 3 * 2 * 4);
        // RGB sources decode as fully opaque
        assert_eq!(img.pixel(1, 1), Some([40, 40, 128, 255]));
    }

    #[test]
    fn test_decode_jpeg() {
        let bytes = encoded(8, 8, ImageFormat::Jpeg);
        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width, img.height), (8, 8));
    }

    #[test]
    fn test_decode_preserves_alpha() {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 255, 100]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(&out.into_inner()).unwrap();
        assert_eq!(decoded.pixel(0, 0), Some([0, 0, 255, 100]));
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = encoded(16, 16, ImageFormat::Png);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_decode_no_orientation_keeps_stored_order() {
        let bytes = encoded(3, 2, ImageFormat::Png);
        let stored = decode_image_no_orientation(&bytes).unwrap();
        assert_eq!(stored, decode_image(&bytes).unwrap());
        assert!(matches!(
            decode_image_no_orientation(b"junk"),
            Err(DecodeError::InvalidFormat)
        ));
    }

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(&encoded(1, 1, ImageFormat::Png)));
        assert!(is_supported_image(&encoded(1, 1, ImageFormat::Bmp)));
        assert!(!is_supported_image(b"%PDF-1.7 not an image"));
        assert!(!is_supported_image(&[]));
    }

    #[test]
    fn test_orientation_extraction_no_exif() {
        let bytes = encoded(4, 4, ImageFormat::Jpeg);
        assert_eq!(get_orientation(&bytes), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::new(2, 1));
        let result = apply_orientation(img, Orientation::Rotate90CW);
        assert_eq!((result.width(), result.height()), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let mut src = image::RgbaImage::new(2, 1);
        src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        src.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));

        let result = apply_orientation(DynamicImage::ImageRgba8(src), Orientation::FlipHorizontal)
            .into_rgba8();

        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }
}
