//! Size-bounded base64url codec for cookie payloads.
//!
//! Format: base64url of the UTF-8 text, written without `=` padding and
//! read with or without it. Both the encoded string and the decoded text
//! are capped at [`MAX_ENCODED_LENGTH`] characters. Every failure is
//! absorbed into `None`.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use tracing::debug;

use crate::error::SnapshotError;
use crate::types::MAX_ENCODED_LENGTH;

/// URL-safe alphabet, unpadded output, padding optional on input.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode text into a cookie-safe payload, or `None` if it would exceed the bound.
///
/// `None` means "could not persist"; the output is never truncated.
pub fn encode_payload(text: &str) -> Option<String> {
    try_encode_payload(text)
        .map_err(|e| debug!("payload encode rejected: {e}"))
        .ok()
}

/// Decode a cookie payload back into text, or `None` on any failure.
pub fn decode_payload(encoded: &str) -> Option<String> {
    try_decode_payload(encoded)
        .map_err(|e| debug!("payload decode rejected: {e}"))
        .ok()
}

/// Encode text into a cookie-safe payload.
///
/// # Errors
/// Returns `SnapshotError::SizeExceeded` if the text or its encoding is
/// longer than [`MAX_ENCODED_LENGTH`].
pub fn try_encode_payload(text: &str) -> Result<String, SnapshotError> {
    check_length(text_length(text))?;
    let encoded = PAYLOAD_ENGINE.encode(text.as_bytes());
    check_length(encoded.len())?;
    Ok(encoded)
}

/// Decode a cookie payload back into text.
///
/// The length is checked before any base64 work is done.
///
/// # Errors
/// Returns `SnapshotError` if the input is empty or oversized, is not valid
/// base64url, does not decode to UTF-8, or decodes to oversized text.
pub fn try_decode_payload(encoded: &str) -> Result<String, SnapshotError> {
    if encoded.is_empty() {
        let reason = "empty payload".to_string();
        return Err(SnapshotError::MalformedEncoding(reason));
    }
    check_length(encoded.len())?;

    let bytes = PAYLOAD_ENGINE
        .decode(encoded)
        .map_err(|e| SnapshotError::MalformedEncoding(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|_| SnapshotError::InvalidUtf8)?;

    check_length(text_length(&text))?;
    Ok(text)
}

/// Length in UTF-16 code units, the unit the web client measures in.
fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

fn check_length(len: usize) -> Result<(), SnapshotError> {
    if len > MAX_ENCODED_LENGTH {
        return Err(SnapshotError::SizeExceeded {
            len,
            max: MAX_ENCODED_LENGTH,
        });
    }
    Ok(())
}
