//! Image encoding: rendered page → PNG bytes → base64 payload.
//!
//! PNG is chosen over JPEG because it is lossless. Text crispness matters
//! far more than file size for the model's reading accuracy, and compression
//! artefacts on rendered glyphs measurably degrade transcription.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rendered page as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!("Encoded page image → {} bytes PNG", buf.len());
    Ok(buf)
}

/// Base64-encode bytes for an `inline_data` request part.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let png = encode_png(&img).expect("encode should succeed");
        // PNG signature
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn base64_roundtrip() {
        let bytes = vec![0u8, 1, 2, 254, 255];
        let encoded = to_base64(&bytes);
        let decoded = STANDARD.decode(&encoded).expect("valid base64");
        assert_eq!(decoded, bytes);
    }
}
