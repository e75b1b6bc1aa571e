//! Inline media helpers.
//!
//! Uploads are stored as self-describing data URLs (`data:<mime>;base64,<payload>`)
//! directly inside user and post records; there is no external object storage.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::{AppError, AppResult};

/// Encode raw bytes as an inline data URL.
#[must_use]
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Validate an inline media string.
///
/// Accepts a data URL whose base64 payload decodes to at most `max_bytes`.
/// The transport layer already caps the request body; this is the per-blob
/// guard applied again before anything is persisted.
pub fn validate_inline_media(value: &str, max_bytes: usize) -> AppResult<()> {
    let Some(rest) = value.strip_prefix("data:") else {
        return Err(AppError::Validation(
            "inline media must be a data URL".to_string(),
        ));
    };

    let Some((_mime, payload)) = rest.split_once(";base64,") else {
        return Err(AppError::Validation(
            "inline media must be base64-encoded".to_string(),
        ));
    };

    let decoded = STANDARD
        .decode(payload)
        .map_err(|_| AppError::Validation("inline media payload is not valid base64".to_string()))?;

    if decoded.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "inline media exceeds the {max_bytes} byte limit"
        )));
    }

    Ok(())
}
