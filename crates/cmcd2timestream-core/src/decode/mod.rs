//! Decoders for the composite fields of a log line.
//!
//! Each decoder turns one raw field value into zero or more entries. Malformed
//! sub-tokens are skipped and reported alongside the entries rather than
//! failing the field.

mod headers;
mod telemetry;

pub use headers::decode_headers;
pub use telemetry::{decode_query_string, split_telemetry, TELEMETRY_PARAMETER};

use crate::error::CompositeDecodeError;
use crate::record::{Dimension, Measure};

/// Entries produced by one composite field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub dimensions: Vec<Dimension>,
    pub measures: Vec<Measure>,
    pub skipped: Vec<CompositeDecodeError>,
}

impl Decoded {
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty() && self.measures.is_empty()
    }
}

/// Percent-decode `value` once. Bytes are kept as-is so callers can split on
/// separators before checking UTF-8 per sub-token.
pub(crate) fn percent_decode(value: &[u8]) -> Vec<u8> {
    urlencoding::decode_binary(value).into_owned()
}

/// Split decoded bytes on `separator` and convert each piece to UTF-8.
///
/// A piece that is not valid UTF-8 becomes an `Err` carrying the reason; the
/// other pieces are unaffected.
pub(crate) fn split_utf8(
    bytes: &[u8],
    separator: u8,
) -> impl Iterator<Item = Result<&str, String>> {
    bytes
        .split(move |b| *b == separator)
        .map(|piece| std::str::from_utf8(piece).map_err(|e| e.to_string()))
}
