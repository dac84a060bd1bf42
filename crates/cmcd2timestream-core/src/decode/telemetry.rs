// CMCD telemetry carried in the request query string.
//
// Players append `CMCD=<key>=<value>,<key>,...` to segment requests. The
// parameter value arrives percent-encoded twice (once by the player, once by
// the CDN when logging), on top of the query-string encoding itself.

use std::collections::HashMap;

use super::{percent_decode, split_utf8, Decoded};
use crate::error::CompositeDecodeError;
use crate::record::{Dimension, Measure};
use crate::schema::{CompositeKind, FieldRole, TelemetryKey};

/// Query parameter carrying the telemetry string.
pub const TELEMETRY_PARAMETER: &str = "CMCD";

/// Value of a boolean key sent in its short, value-less form.
const FLAG_VALUE: &str = "true";

/// Decode the `CMCD` parameter of `query` against the recognised `keys`.
///
/// Keys not present in `keys` are dropped. An absent parameter yields no
/// entries.
pub fn decode_query_string(query: &str, keys: &[TelemetryKey]) -> Decoded {
    let mut decoded = Decoded::default();

    let mut values = url::form_urlencoded::parse(query.as_bytes())
        .filter(|(name, _)| name == TELEMETRY_PARAMETER)
        .map(|(_, value)| value.into_owned())
        .peekable();
    if values.peek().is_none() {
        return decoded;
    }
    let raw: String = values.collect();

    let bytes = percent_decode(&percent_decode(raw.as_bytes()));
    let mut tokens = Vec::new();
    for token in split_utf8(&bytes, b',') {
        match token {
            Ok(token) => tokens.push(token),
            Err(reason) => decoded.skipped.push(CompositeDecodeError::InvalidEncoding {
                kind: CompositeKind::TelemetryQuery,
                reason,
            }),
        }
    }
    let telemetry = tokens.join(",");

    let (pairs, skipped) = split_telemetry(&telemetry);
    decoded.skipped.extend(skipped);

    for key in keys {
        let Some(value) = pairs.get(key.key) else {
            continue;
        };
        match key.role {
            FieldRole::Dimension => decoded
                .dimensions
                .push(Dimension::new(key.output_name(), value.trim())),
            FieldRole::Measure => decoded.measures.push(Measure::new(
                key.output_name(),
                key.value_type,
                value.trim(),
            )),
            FieldRole::Timestamp => {}
        }
    }

    decoded
}

/// Split a decoded telemetry string into a key → value map.
///
/// Tokens are separated by `,` and split on their first `=`. A token without
/// `=` is a flag and maps to `"true"`. When a key repeats, the last occurrence
/// wins.
pub fn split_telemetry(telemetry: &str) -> (HashMap<&str, &str>, Vec<CompositeDecodeError>) {
    let mut pairs = HashMap::new();
    let mut skipped = Vec::new();

    for token in telemetry.split(',').filter(|t| !t.trim().is_empty()) {
        let (key, value) = token.split_once('=').unwrap_or((token, FLAG_VALUE));
        let key = key.trim();
        if key.is_empty() {
            skipped.push(CompositeDecodeError::EmptyTelemetryKey {
                token: token.to_string(),
            });
            continue;
        }
        pairs.insert(key, value);
    }

    (pairs, skipped)
}
