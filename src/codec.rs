//! Conversion between the wire encoding (base64 text) and in-memory camera
//! frames. Everything the service receives or returns passes through here.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{ImageOutputFormat, RgbImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("input is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded bytes are not a recognizable image: {0}")]
    Image(#[from] image::ImageError),
}

/// A camera frame decoded from the wire: the compressed bytes as received,
/// plus the RGB pixel buffer parsed from them. The bytes are kept around so
/// the detector backends can consume the frame in its original container
/// format.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub bytes: Vec<u8>,
    pub pixels: RgbImage,
}

impl DecodedFrame {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Decode a base64-encoded camera frame. Browser clients send data URLs
/// (`data:image/png;base64,<payload>`), so anything up to the first comma is
/// treated as a MIME prefix and stripped.
pub fn decode(input: &str) -> Result<DecodedFrame, CodecError> {
    let payload = match input.split_once(',') {
        Some((_prefix, rest)) => rest,
        None => input,
    };

    let bytes = general_purpose::STANDARD.decode(payload)?;
    let pixels = image::load_from_memory(&bytes)?.to_rgb8();

    Ok(DecodedFrame { bytes, pixels })
}

/// Serialize a pixel buffer to the given raster format and base64-encode
/// the result. The vision routes use PNG so the annotated frame survives
/// the trip back losslessly.
pub fn encode(pixels: &RgbImage, format: ImageOutputFormat) -> Result<String, CodecError> {
    let mut data: Vec<u8> = Vec::new();
    pixels.write_to(&mut Cursor::new(&mut data), format)?;

    Ok(general_purpose::STANDARD.encode(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::{test_frame_b64, TEST_FRAME};

    #[test]
    fn png_round_trip_is_pixel_identical() {
        let encoded = encode(&TEST_FRAME, ImageOutputFormat::Png).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.pixels.as_raw(), TEST_FRAME.as_raw());
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        let encoded = format!("data:image/png;base64,{}", test_frame_b64());
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.width(), TEST_FRAME.width());
        assert_eq!(decoded.height(), TEST_FRAME.height());
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let result = decode("definitely not base64!!!");
        assert!(matches!(result, Err(CodecError::Base64(_))));
    }

    #[test]
    fn non_image_bytes_are_rejected() {
        let encoded = general_purpose::STANDARD.encode(b"these bytes are no raster image");
        let result = decode(&encoded);
        assert!(matches!(result, Err(CodecError::Image(_))));
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let mut encoded = test_frame_b64();
        encoded.truncate(encoded.len() / 2);
        assert!(decode(&encoded).is_err());
    }
}
