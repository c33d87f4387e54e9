//! Re-encoding of provider image bytes into a plain RGB JPEG.
//!
//! Static Maps answers in PNG (often palette-indexed) or other containers
//! depending on the request; the vision provider is always handed
//! `image/jpeg`.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::error::ImageryError;

/// Decodes `raw`, drops any alpha channel, and re-encodes at `quality` (1-100).
///
/// `center` only labels the error.
///
/// # Errors
///
/// - [`ImageryError::EmptyBody`] if `raw` is empty.
/// - [`ImageryError::Decode`] if `raw` is not a supported image.
/// - [`ImageryError::Encode`] if JPEG encoding fails.
pub fn normalize_to_jpeg(raw: &[u8], quality: u8, center: &str) -> Result<Vec<u8>, ImageryError> {
    if raw.is_empty() {
        return Err(ImageryError::EmptyBody {
            center: center.to_owned(),
        });
    }

    let rgb = decode_rgb(raw).map_err(|source| ImageryError::Decode {
        center: center.to_owned(),
        source,
    })?;

    encode_jpeg(&rgb, quality).map_err(|source| ImageryError::Encode {
        center: center.to_owned(),
        source,
    })
}

fn decode_rgb(raw: &[u8]) -> Result<RgbImage, image::ImageError> {
    Ok(image::load_from_memory(raw)?.into_rgb8())
}

fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    use super::*;

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([30, 60, 90, 128]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("png encode");
        buf
    }

    #[test]
    fn png_with_alpha_becomes_jpeg_of_same_size() {
        let jpeg = normalize_to_jpeg(&png_fixture(8, 6), 90, "0,0").expect("normalize");

        assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "JPEG SOI marker");
        let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = normalize_to_jpeg(b"definitely not an image", 90, "1,2").unwrap_err();
        assert!(matches!(err, ImageryError::Decode { ref center, .. } if center == "1,2"));
    }

    #[test]
    fn empty_body_is_rejected_before_decoding() {
        let err = normalize_to_jpeg(&[], 90, "1,2").unwrap_err();
        assert!(matches!(err, ImageryError::EmptyBody { .. }));
    }

    #[test]
    fn out_of_range_quality_is_clamped() {
        assert!(normalize_to_jpeg(&png_fixture(2, 2), 0, "0,0").is_ok());
        assert!(normalize_to_jpeg(&png_fixture(2, 2), 255, "0,0").is_ok());
    }
}
