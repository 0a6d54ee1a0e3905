// src/core/capture.rs
use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("{0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image payload is empty")]
    Empty,
}

/// Drops a `data:<mime>;base64,` style header, keeping everything after the
/// first comma.
pub fn strip_data_url(image: &str) -> &str {
    match image.split_once(',') {
        Some((_, payload)) => payload,
        None => image,
    }
}

/// Decodes a captured image sent as base64, with or without a data-URL
/// header. ASCII whitespace inside the payload is ignored.
pub fn decode_captured_image(image: &str) -> Result<Vec<u8>, CaptureError> {
    let payload: String = strip_data_url(image).split_ascii_whitespace().collect();
    let bytes = STANDARD.decode(payload)?;

    if bytes.is_empty() {
        return Err(CaptureError::Empty);
    }

    Ok(bytes)
}
