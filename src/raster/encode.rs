//! PNG encoding and `data:` URI wrapping for finished canvases.

use base64::Engine;
use image::RgbImage;

use crate::error::FlowError;

pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Encode an RGB canvas as PNG bytes.
pub fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>, FlowError> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        image::ColorType::Rgb8,
    )?;
    Ok(buf)
}

/// Wrap PNG bytes in a base64 data URI.
pub fn to_data_uri(png: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(png);
    format!("{}{}", DATA_URI_PREFIX, b64)
}

/// Extract the PNG bytes from a data URI produced by [`to_data_uri`].
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, String> {
    let b64_data = uri
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or_else(|| "Invalid data URI: expected a base64 PNG".to_string())?;
    base64::engine::general_purpose::STANDARD
        .decode(b64_data)
        .map_err(|e| format!("Base64 decode error: {}", e))
}
