//! Versioned positional field schemas.
//!
//! A schema is a fixed, ordered table of [`FieldDescriptor`]s whose order must
//! equal the field order of the real-time log configuration that produced the
//! line. Nothing outside these tables knows how many fields a line carries or
//! which position holds what.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[macro_use]
mod cloudfront;
mod cmcd;
mod v1;
mod v2;

pub use cmcd::{TelemetryKey, CMCD_KEYS, SUPPORTED_HEADERS, TELEMETRY_PREFIX};

/// Declared type of a field value, as understood by the time-series store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text,
    Integer,
    Float,
    Boolean,
    Time,
}

impl ValueType {
    /// Store-side type name (`VARCHAR`, `BIGINT`, ...).
    pub fn as_store_type(&self) -> &'static str {
        match self {
            ValueType::Text => "VARCHAR",
            ValueType::Integer => "BIGINT",
            ValueType::Float => "DOUBLE",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Time => "TIMESTAMP",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_store_type())
    }
}

/// Role a field plays in the resulting time-series point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Dimension,
    Measure,
    Timestamp,
}

/// Composite fields embed a mini-language and are resolved by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    /// Percent-encoded `Header-Name: value` lines.
    Headers,
    /// URL query string possibly carrying a `CMCD` parameter.
    TelemetryQuery,
}

/// How the mapper consumes one schema position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Value is taken directly according to the descriptor's role.
    Scalar,
    /// Value is expanded into zero or more entries by a decoder.
    Composite(CompositeKind),
    /// Position is consumed but nothing is recorded.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub value_type: ValueType,
    pub role: FieldRole,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn timestamp(name: &'static str) -> Self {
        Self {
            name,
            value_type: ValueType::Time,
            role: FieldRole::Timestamp,
            kind: FieldKind::Scalar,
        }
    }

    pub const fn dimension(name: &'static str) -> Self {
        Self {
            name,
            value_type: ValueType::Text,
            role: FieldRole::Dimension,
            kind: FieldKind::Scalar,
        }
    }

    pub const fn measure(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            value_type,
            role: FieldRole::Measure,
            kind: FieldKind::Scalar,
        }
    }

    pub const fn composite(name: &'static str, kind: CompositeKind) -> Self {
        Self {
            name,
            value_type: ValueType::Text,
            role: FieldRole::Dimension,
            kind: FieldKind::Composite(kind),
        }
    }

    pub const fn ignored(name: &'static str) -> Self {
        Self {
            name,
            value_type: ValueType::Text,
            role: FieldRole::Dimension,
            kind: FieldKind::Ignored,
        }
    }

    /// Output name with separators replaced so it is identifier-safe.
    pub fn output_name(&self) -> String {
        normalize_name(self.name)
    }
}

/// Replace separator characters so a field or header name can be used as a
/// dimension or measure name.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | '.' | ' ' => '_',
            other => other,
        })
        .collect()
}

/// Published schema versions, selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// CloudFront real-time log fields with CMCD carried in the query string.
    #[default]
    V1,
    /// V1 followed by CloudFront's first-class CMCD fields.
    V2,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::V1, SchemaVersion::V2];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1 => "v1",
            SchemaVersion::V2 => "v2",
        }
    }

    pub fn schema(&self) -> &'static FieldSchema {
        match self {
            SchemaVersion::V1 => &v1::SCHEMA,
            SchemaVersion::V2 => &v2::SCHEMA,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(SchemaVersion::V1),
            "v2" | "2" => Ok(SchemaVersion::V2),
            other => Err(SchemaError::UnknownVersion(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown schema version '{0}' (supported: v1, v2)")]
    UnknownVersion(String),
    #[error("schema {version} must have exactly one timestamp field, found {found}")]
    TimestampCount { version: SchemaVersion, found: usize },
    #[error("schema {version} timestamp field '{name}' must be at position 0, found at {position}")]
    TimestampPosition {
        version: SchemaVersion,
        name: &'static str,
        position: usize,
    },
    #[error("schema {version} has duplicate output name '{name}'")]
    DuplicateName { version: SchemaVersion, name: String },
}

/// An immutable, process-wide field table plus the lookup tables its
/// composite decoders use.
#[derive(Debug)]
pub struct FieldSchema {
    version: SchemaVersion,
    fields: &'static [FieldDescriptor],
    header_allow_list: &'static [&'static str],
    telemetry_keys: &'static [TelemetryKey],
}

impl FieldSchema {
    pub const fn new(
        version: SchemaVersion,
        fields: &'static [FieldDescriptor],
        header_allow_list: &'static [&'static str],
        telemetry_keys: &'static [TelemetryKey],
    ) -> Self {
        Self {
            version,
            fields,
            header_allow_list,
            telemetry_keys,
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn descriptor_at(&self, position: usize) -> Option<&FieldDescriptor> {
        self.fields.get(position)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    pub fn header_allow_list(&self) -> &'static [&'static str] {
        self.header_allow_list
    }

    pub fn telemetry_keys(&self) -> &'static [TelemetryKey] {
        self.telemetry_keys
    }

    /// Check the structural invariants the mapper relies on.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let timestamps: Vec<(usize, &FieldDescriptor)> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.role == FieldRole::Timestamp)
            .collect();

        if timestamps.len() != 1 {
            return Err(SchemaError::TimestampCount {
                version: self.version,
                found: timestamps.len(),
            });
        }
        let (position, field) = timestamps[0];
        if position != 0 {
            return Err(SchemaError::TimestampPosition {
                version: self.version,
                name: field.name,
                position,
            });
        }

        let mut seen = HashSet::new();
        let scalar_names = self
            .fields
            .iter()
            .filter(|field| field.kind == FieldKind::Scalar && field.role != FieldRole::Timestamp)
            .map(FieldDescriptor::output_name);
        let telemetry_names = self.telemetry_keys.iter().map(TelemetryKey::output_name);
        let header_names = self.header_allow_list.iter().map(|h| normalize_name(h));

        for name in scalar_names.chain(telemetry_names).chain(header_names) {
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateName {
                    version: self.version,
                    name,
                });
            }
        }

        Ok(())
    }
}
