// Request headers embedded as a single percent-encoded block of
// `Header-Name: value` lines.

use super::{percent_decode, split_utf8, Decoded};
use crate::error::CompositeDecodeError;
use crate::record::{Dimension, NO_VALUE};
use crate::schema::{normalize_name, CompositeKind};

/// Decode a header block, keeping only headers named in `allow_list`.
///
/// Lines without a `:` or that do not decode to UTF-8 are skipped; the rest of
/// the block is still read.
pub fn decode_headers(block: &str, allow_list: &[&str]) -> Decoded {
    let mut decoded = Decoded::default();
    if block.trim() == NO_VALUE {
        return decoded;
    }

    let bytes = percent_decode(block.as_bytes());
    for line in split_utf8(&bytes, b'\n') {
        let line = match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => line,
            Err(reason) => {
                decoded.skipped.push(CompositeDecodeError::InvalidEncoding {
                    kind: CompositeKind::Headers,
                    reason,
                });
                continue;
            }
        };

        let Some((name, value)) = line.split_once(':') else {
            decoded
                .skipped
                .push(CompositeDecodeError::HeaderWithoutSeparator {
                    line: line.to_string(),
                });
            continue;
        };

        let name = name.trim();
        if allow_list.contains(&name) {
            decoded
                .dimensions
                .push(Dimension::new(normalize_name(name), value.trim()));
        }
    }

    decoded
}
