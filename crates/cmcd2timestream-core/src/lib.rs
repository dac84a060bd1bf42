// cmcd2timestream-core - Platform-agnostic mapping logic
//
// Turns one CDN real-time log line into one multi-measure time-series point.
// No I/O, no async; the schema tables are static and shared by every caller.

pub mod decode;
pub mod error;
pub mod input;
pub mod mapper;
pub mod record;
pub mod schema;

pub use error::{CompositeDecodeError, FieldDecodeError, MappingError, PayloadError};
pub use input::{decode_payload, split_fields};
pub use mapper::{parse_epoch_millis, LineMapping, Mapper};
pub use record::{Dimension, MappedRecord, Measure, NO_VALUE};
pub use schema::{FieldSchema, SchemaError, SchemaVersion, ValueType};

/// Map one line against the schema of `version`.
pub fn map_line(line: &str, version: SchemaVersion) -> LineMapping {
    Mapper::new(version.schema()).map(line)
}
