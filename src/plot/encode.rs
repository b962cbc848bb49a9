//! PNG + base64 encoding of rendered figures

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::PlotError;

/// Encode a packed RGB8 buffer as PNG and return it base64-encoded.
pub fn png_base64(rgb: &[u8], width: u32, height: u32) -> Result<String, PlotError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(rgb, width, height, ExtendedColorType::Rgb8)?;
    Ok(STANDARD.encode(png))
}

/// Inverse of the base64 step, used when inspecting responses.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_base64_produces_png() {
        let rgb = vec![255u8; 4 * 3 * 3];
        let encoded = png_base64(&rgb, 4, 3).expect("encode");
        let png = decode_base64(&encoded).expect("decode");
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
    }
}
