//! Decoding of uploaded image payloads.

use base64::Engine;
use image::RgbImage;
use thiserror::Error;
use tracing::debug;

/// Why an uploaded image could not be turned into a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// No image field was supplied.
    #[error("No image provided.")]
    Missing,
    /// The field was not valid base64 or not a decodable image.
    #[error("Could not decode image.")]
    Undecodable,
}

/// Decodes a base64 image, optionally prefixed with a data-URL header.
///
/// A payload containing a comma is treated as `header,data` and only the
/// part after the first comma is decoded.
///
/// # Errors
///
/// Returns [`PayloadError::Undecodable`] if the base64 or the image inside
/// cannot be decoded.
pub fn decode_image_payload(payload: &str) -> Result<RgbImage, PayloadError> {
    let data = payload.split(',').nth(1).unwrap_or(payload);
    let data: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data.as_bytes())
        .map_err(|e| {
            debug!("Invalid base64 payload: {e}");
            PayloadError::Undecodable
        })?;

    let image = image::load_from_memory(&bytes).map_err(|e| {
        debug!("Undecodable image payload ({} bytes): {e}", bytes.len());
        PayloadError::Undecodable
    })?;

    Ok(image.to_rgb8())
}
