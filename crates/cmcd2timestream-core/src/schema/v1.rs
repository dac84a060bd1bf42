use super::cmcd::{CMCD_KEYS, SUPPORTED_HEADERS};
use super::{CompositeKind, FieldDescriptor, FieldSchema, SchemaVersion, ValueType};

static FIELDS: [FieldDescriptor; 40] = cloudfront_fields!(FieldDescriptor::composite(
    "cs-uri-query",
    CompositeKind::TelemetryQuery
));

pub(super) static SCHEMA: FieldSchema =
    FieldSchema::new(SchemaVersion::V1, &FIELDS, &SUPPORTED_HEADERS, &CMCD_KEYS);
