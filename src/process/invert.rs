use image::ImageFormat;
use std::io::Cursor;

use crate::error::ScanError;

/// MIME type of locally converted frames
pub const OUTPUT_MIME: &str = "image/png";

/// Turn a negative frame into a positive by inverting each color channel
/// per pixel (`255 - v`). Alpha stays as captured. Applying the transform
/// twice restores the original channel values.
///
/// The result is re-encoded as PNG regardless of the input format.
pub fn invert_frame(payload: &[u8]) -> Result<Vec<u8>, ScanError> {
    let img = image::load_from_memory(payload)
        .map_err(|e| ScanError::ReadFailure(format!("frame did not decode: {}", e)))?;

    let mut rgba = img.into_rgba8();
    for pixel in rgba.pixels_mut() {
        pixel[0] = 255 - pixel[0];
        pixel[1] = 255 - pixel[1];
        pixel[2] = 255 - pixel[2];
    }

    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| {
            ScanError::ValidationFailure(format!("converted frame failed to encode: {}", e))
        })?;

    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(img: image::RgbaImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn decode(bytes: &[u8]) -> image::RgbaImage {
        image::load_from_memory(bytes).unwrap().into_rgba8()
    }

    #[test]
    fn test_inversion_flips_color_channels_and_keeps_alpha() {
        let source = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 100, 200, 128]));
        let inverted = decode(&invert_frame(&encode(source)).unwrap());

        for pixel in inverted.pixels() {
            assert_eq!(pixel[0], 245);
            assert_eq!(pixel[1], 155);
            assert_eq!(pixel[2], 55);
            assert_eq!(pixel[3], 128);
        }
    }

    #[test]
    fn test_inversion_is_involutive() {
        let mut source = image::RgbaImage::new(4, 1);
        for (x, pixel) in source.pixels_mut().enumerate() {
            *pixel = image::Rgba([x as u8 * 60, 255 - x as u8 * 40, x as u8, 200]);
        }
        let original = source.clone();

        let once = invert_frame(&encode(source)).unwrap();
        let twice = decode(&invert_frame(&once).unwrap());

        for (restored, expected) in twice.pixels().zip(original.pixels()) {
            assert_eq!(restored, expected);
        }
    }

    #[test]
    fn test_channel_inversion_is_involutive_for_every_value() {
        for v in 0u8..=255 {
            assert_eq!(255 - (255 - v), v);
        }
    }

    #[test]
    fn test_undecodable_payload_is_a_read_failure() {
        let result = invert_frame(b"not an image at all");
        assert!(matches!(result, Err(ScanError::ReadFailure(_))));
    }
}
