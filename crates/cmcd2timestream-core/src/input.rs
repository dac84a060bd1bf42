//! Raw payload handling ahead of the mapper.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::PayloadError;

/// Field separator of a real-time log line.
pub const FIELD_SEPARATOR: char = '\t';

/// Decode a base64 stream payload into one log line.
pub fn decode_payload(data: &str) -> Result<String, PayloadError> {
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| PayloadError::Base64(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| PayloadError::Utf8(e.to_string()))
}

/// Split a line into raw field values.
///
/// Only the line terminator is stripped; trailing empty fields stay in place
/// so later positions keep their index.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.trim_end_matches(['\r', '\n'])
        .split(FIELD_SEPARATOR)
        .collect()
}
