use std::io::Cursor;

use egui::{Color32, ColorImage};
use image::{ImageFormat, RgbaImage};
use thiserror::Error;

/// Errors from the snapshot codec. Both directions are recoverable: the
/// canvas logs and clears rather than propagating these to the user.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode canvas content: {0}")]
    Encode(#[source] image::ImageError),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] image::ImageError),
    #[error("canvas buffer dimensions are invalid")]
    InvalidDimensions,
}

/// Encode a pixel buffer as a PNG snapshot.
pub fn encode_png(image: &ColorImage) -> Result<Vec<u8>, SnapshotError> {
    let [width, height] = image.size;

    let mut raw = Vec::with_capacity(width * height * 4);
    for pixel in &image.pixels {
        raw.extend_from_slice(&pixel.to_array());
    }

    let buffer = RgbaImage::from_raw(width as u32, height as u32, raw)
        .ok_or(SnapshotError::InvalidDimensions)?;

    let mut bytes = Vec::new();
    buffer
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(SnapshotError::Encode)?;
    Ok(bytes)
}

/// Decode a snapshot back into a pixel buffer.
pub fn decode_png(bytes: &[u8]) -> Result<ColorImage, SnapshotError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(SnapshotError::Decode)?
        .to_rgba8();

    let size = [decoded.width() as usize, decoded.height() as usize];
    let pixels = decoded
        .pixels()
        .map(|p| Color32::from_rgba_premultiplied(p[0], p[1], p[2], p[3]))
        .collect();
    Ok(ColorImage { size, pixels })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_lossless() {
        let mut image = ColorImage::new([20, 10], Color32::WHITE);
        image.pixels[5 * 20 + 7] = Color32::BLACK;
        image.pixels[0] = Color32::from_rgb(200, 30, 30);

        let bytes = encode_png(&image).unwrap();
        let decoded = decode_png(&bytes).unwrap();

        assert_eq!(decoded.size, image.size);
        assert_eq!(decoded.pixels, image.pixels);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = decode_png(b"not-a-valid-image");
        assert!(matches!(result, Err(SnapshotError::Decode(_))));
    }
}
