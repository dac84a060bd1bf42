//! Error taxonomy for mapping a single log line.
//!
//! None of these abort a batch. Field and composite errors are recovered where
//! they occur; the mapper collects them so callers can log and count them.

use crate::schema::CompositeKind;
use thiserror::Error;

/// One schema position could not be turned into a value for its role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldDecodeError {
    /// The line ended before this position.
    #[error("field '{field}' (position {position}) is missing: line has {available} fields")]
    Missing {
        field: &'static str,
        position: usize,
        available: usize,
    },

    /// The timestamp is not a finite, non-negative number of seconds.
    #[error("field '{field}' (position {position}) is not a valid epoch-seconds timestamp: '{value}'")]
    InvalidTimestamp {
        field: &'static str,
        position: usize,
        value: String,
    },
}

impl FieldDecodeError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field, .. } | Self::InvalidTimestamp { field, .. } => field,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            Self::Missing { position, .. } | Self::InvalidTimestamp { position, .. } => *position,
        }
    }
}

/// A sub-token of a composite field was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeDecodeError {
    /// A line or token is not UTF-8 once percent-decoded.
    #[error("{kind:?} sub-token is not valid UTF-8 after percent-decoding: {reason}")]
    InvalidEncoding { kind: CompositeKind, reason: String },

    /// A header line without a `:` separator.
    #[error("header line has no ':' separator: '{line}'")]
    HeaderWithoutSeparator { line: String },

    /// A telemetry token whose key is empty, e.g. `=5`.
    #[error("telemetry token has an empty key: '{token}'")]
    EmptyTelemetryKey { token: String },
}

/// A raw payload could not be turned into a log line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload is not valid base64: {0}")]
    Base64(String),

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(String),
}

/// A mapped line could not become a time-series point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("record has no timestamp")]
    MissingTimestamp,
}
