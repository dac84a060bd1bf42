// CMCD values arrive as first-class log fields, so the query string is only
// consumed positionally.

use super::cmcd::SUPPORTED_HEADERS;
use super::{CompositeKind, FieldDescriptor, FieldSchema, SchemaVersion, ValueType};

static FIELDS: [FieldDescriptor; 58] = cloudfront_fields!(
    FieldDescriptor::ignored("cs-uri-query"),
    FieldDescriptor::measure("cmcd-encoded-bitrate", ValueType::Integer),
    FieldDescriptor::measure("cmcd-buffer-length", ValueType::Integer),
    FieldDescriptor::measure("cmcd-buffer-starvation", ValueType::Boolean),
    FieldDescriptor::dimension("cmcd-content-id"),
    FieldDescriptor::measure("cmcd-object-duration", ValueType::Integer),
    FieldDescriptor::measure("cmcd-deadline", ValueType::Integer),
    FieldDescriptor::measure("cmcd-measured-throughput", ValueType::Integer),
    FieldDescriptor::dimension("cmcd-next-object-request"),
    FieldDescriptor::dimension("cmcd-next-range-request"),
    FieldDescriptor::dimension("cmcd-object-type"),
    FieldDescriptor::dimension("cmcd-playback-rate"),
    FieldDescriptor::measure("cmcd-requested-maximum-throughput", ValueType::Integer),
    FieldDescriptor::dimension("cmcd-streaming-format"),
    FieldDescriptor::dimension("cmcd-session-id"),
    FieldDescriptor::dimension("cmcd-stream-type"),
    FieldDescriptor::dimension("cmcd-startup"),
    FieldDescriptor::measure("cmcd-top-bitrate", ValueType::Integer),
    FieldDescriptor::dimension("cmcd-version"),
);

pub(super) static SCHEMA: FieldSchema =
    FieldSchema::new(SchemaVersion::V2, &FIELDS, &SUPPORTED_HEADERS, &[]);
