//! Schema-driven mapping of one tab-delimited log line to a time-series point.
//!
//! The mapper walks the schema positionally. Every position yields its own
//! `Result`; a failed position is recorded and the walk continues, so a bad
//! field never costs the rest of the line.

use crate::decode::{decode_headers, decode_query_string, Decoded};
use crate::error::{CompositeDecodeError, FieldDecodeError, MappingError};
use crate::input::split_fields;
use crate::record::{Dimension, MappedRecord, Measure, RecordBuilder};
use crate::schema::{CompositeKind, FieldDescriptor, FieldKind, FieldRole, FieldSchema};

/// Outcome of mapping one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMapping {
    /// The point, or why none could be produced.
    pub record: Result<MappedRecord, MappingError>,
    /// Positions that were skipped.
    pub field_errors: Vec<FieldDecodeError>,
    /// Sub-tokens of composite fields that were skipped.
    pub composite_errors: Vec<CompositeDecodeError>,
}

impl LineMapping {
    pub fn is_clean(&self) -> bool {
        self.record.is_ok() && self.field_errors.is_empty() && self.composite_errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Mapper<'a> {
    schema: &'a FieldSchema,
}

impl<'a> Mapper<'a> {
    pub fn new(schema: &'a FieldSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a FieldSchema {
        self.schema
    }

    /// Map one raw log line. Never fails as a whole; see [`LineMapping`].
    pub fn map(&self, line: &str) -> LineMapping {
        let values = split_fields(line);
        let mut builder = RecordBuilder::new();
        let mut field_errors = Vec::new();
        let mut composite_errors = Vec::new();

        for (position, descriptor) in self.schema.fields().iter().enumerate() {
            let outcome = match values.get(position) {
                Some(raw) => self.map_field(
                    position,
                    descriptor,
                    raw,
                    &mut builder,
                    &mut composite_errors,
                ),
                None => Err(FieldDecodeError::Missing {
                    field: descriptor.name,
                    position,
                    available: values.len(),
                }),
            };

            if let Err(error) = outcome {
                tracing::debug!(
                    field = descriptor.name,
                    position,
                    error = %error,
                    "Skipping field"
                );
                field_errors.push(error);
            }
        }

        if values.len() > self.schema.len() {
            tracing::debug!(
                expected = self.schema.len(),
                found = values.len(),
                schema = %self.schema.version(),
                "Line has more fields than the schema; extra fields ignored"
            );
        }

        for error in &composite_errors {
            tracing::debug!(error = %error, "Skipping composite sub-token");
        }

        LineMapping {
            record: builder.finish(),
            field_errors,
            composite_errors,
        }
    }

    fn map_field(
        &self,
        position: usize,
        descriptor: &FieldDescriptor,
        raw: &str,
        builder: &mut RecordBuilder,
        composite_errors: &mut Vec<CompositeDecodeError>,
    ) -> Result<(), FieldDecodeError> {
        let value = raw.trim();

        match descriptor.kind {
            FieldKind::Ignored => {}
            FieldKind::Composite(kind) => {
                let decoded = match kind {
                    CompositeKind::Headers => {
                        decode_headers(value, self.schema.header_allow_list())
                    }
                    CompositeKind::TelemetryQuery => {
                        decode_query_string(value, self.schema.telemetry_keys())
                    }
                };
                merge(builder, decoded, composite_errors);
            }
            FieldKind::Scalar => match descriptor.role {
                FieldRole::Dimension => {
                    builder.dimension(Dimension::new(descriptor.output_name(), value));
                }
                FieldRole::Measure => {
                    builder.measure(Measure::new(
                        descriptor.output_name(),
                        descriptor.value_type,
                        value,
                    ));
                }
                FieldRole::Timestamp => {
                    let millis = parse_epoch_millis(value).ok_or_else(|| {
                        FieldDecodeError::InvalidTimestamp {
                            field: descriptor.name,
                            position,
                            value: value.to_string(),
                        }
                    })?;
                    builder.timestamp_millis(millis);
                }
            },
        }

        Ok(())
    }
}

fn merge(
    builder: &mut RecordBuilder,
    decoded: Decoded,
    composite_errors: &mut Vec<CompositeDecodeError>,
) {
    for dimension in decoded.dimensions {
        builder.dimension(dimension);
    }
    for measure in decoded.measures {
        builder.measure(measure);
    }
    composite_errors.extend(decoded.skipped);
}

/// Convert fractional epoch seconds to whole milliseconds, rounding down.
///
/// Plain decimal input (`1700000000.123`) is converted digit-wise so the
/// result is exact; other numeric forms go through `f64`.
pub fn parse_epoch_millis(seconds: &str) -> Option<i64> {
    if let Some(millis) = parse_decimal_millis(seconds) {
        return Some(millis);
    }

    let seconds: f64 = seconds.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let millis = (seconds * 1000.0).floor();
    // i64::MAX as f64 rounds up to 2^63, which does not fit
    if millis >= i64::MAX as f64 {
        return None;
    }
    Some(millis as i64)
}

fn parse_decimal_millis(seconds: &str) -> Option<i64> {
    let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = whole.parse().ok()?;
    let millis_digits: String = fraction.chars().chain("000".chars()).take(3).collect();
    let millis: i64 = millis_digits.parse().ok()?;

    whole.checked_mul(1000)?.checked_add(millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaVersion, ValueType, SUPPORTED_HEADERS};

    static FIELDS: [FieldDescriptor; 6] = [
        FieldDescriptor::timestamp("timestamp"),
        FieldDescriptor::dimension("c-ip"),
        FieldDescriptor::measure("sc-bytes", ValueType::Integer),
        FieldDescriptor::composite("cs-uri-query", CompositeKind::TelemetryQuery),
        FieldDescriptor::composite("cs-headers", CompositeKind::Headers),
        FieldDescriptor::measure("sc-content-len", ValueType::Integer),
    ];

    static SCHEMA: FieldSchema = FieldSchema::new(
        SchemaVersion::V1,
        &FIELDS,
        &SUPPORTED_HEADERS,
        &crate::schema::CMCD_KEYS,
    );

    #[test]
    fn test_maps_well_formed_line() {
        let line = "1700000000.123\t192.0.2.10\t5120\tCMCD=bl%3D100%2Ccid%3Dabc%2Csu\tCloudFront-Is-Mobile-Viewer:true\t-";
        let mapping = Mapper::new(&SCHEMA).map(line);
        assert!(mapping.is_clean());

        let record = mapping.record.unwrap();
        assert_eq!(record.timestamp_millis, 1_700_000_000_123);
        assert_eq!(record.time(), "1700000000123");
        assert_eq!(
            record.dimensions,
            vec![
                Dimension::new("c_ip", "192.0.2.10"),
                Dimension::new("cmcd_cid", "abc"),
                Dimension::new("cmcd_su", "true"),
                Dimension::new("CloudFront_Is_Mobile_Viewer", "true"),
            ]
        );
        assert_eq!(
            record.measures,
            vec![
                Measure::new("sc_bytes", ValueType::Integer, "5120"),
                Measure::new("cmcd_bl", ValueType::Integer, "100"),
            ]
        );
    }

    #[test]
    fn test_sentinel_measures_never_appear() {
        let line = "1700000000\t192.0.2.10\t -\t-\t-\t-";
        let record = Mapper::new(&SCHEMA).map(line).record.unwrap();
        assert!(record.measures.is_empty());
        assert_eq!(record.dimensions, vec![Dimension::new("c_ip", "192.0.2.10")]);
    }

    #[test]
    fn test_short_line_keeps_consumed_fields() {
        let line = "1700000000.5\t192.0.2.10\t5120\tCMCD=br%3D800";
        let mapping = Mapper::new(&SCHEMA).map(line);

        let record = mapping.record.unwrap();
        assert_eq!(record.timestamp_millis, 1_700_000_000_500);
        assert_eq!(record.dimension("c_ip"), Some("192.0.2.10"));
        assert_eq!(record.measure("sc_bytes").unwrap().value, "5120");
        assert_eq!(record.measure("cmcd_br").unwrap().value, "800");

        let missing: Vec<&str> = mapping.field_errors.iter().map(|e| e.field()).collect();
        assert_eq!(missing, vec!["cs-headers", "sc-content-len"]);
        assert!(mapping
            .field_errors
            .iter()
            .all(|e| matches!(e, FieldDecodeError::Missing { available: 4, .. })));
    }

    #[test]
    fn test_bad_timestamp_is_reported_and_rest_mapped() {
        let line = "not-a-time\t192.0.2.10\t5120\t-\t-\t100";
        let mapping = Mapper::new(&SCHEMA).map(line);

        assert_eq!(mapping.record, Err(MappingError::MissingTimestamp));
        assert_eq!(
            mapping.field_errors,
            vec![FieldDecodeError::InvalidTimestamp {
                field: "timestamp",
                position: 0,
                value: "not-a-time".to_string(),
            }]
        );
    }

    #[test]
    fn test_composite_errors_are_collected() {
        let line = "1700000000\t192.0.2.10\t1\tCMCD=%3D5%2Cbr%3D1\tnoseparator\t1";
        let mapping = Mapper::new(&SCHEMA).map(line);
        assert!(mapping.record.is_ok());
        assert!(mapping.field_errors.is_empty());
        assert_eq!(mapping.composite_errors.len(), 2);
    }

    #[test]
    fn test_trailing_newline_is_not_part_of_last_field() {
        let line = "1700000000\t192.0.2.10\t1\t-\t-\t42\r\n";
        let record = Mapper::new(&SCHEMA).map(line).record.unwrap();
        assert_eq!(record.measure("sc_content_len").unwrap().value, "42");
    }

    #[test]
    fn test_parse_epoch_millis_floors() {
        assert_eq!(parse_epoch_millis("1700000000.123"), Some(1_700_000_000_123));
        assert_eq!(parse_epoch_millis("1700000000.1239"), Some(1_700_000_000_123));
        assert_eq!(parse_epoch_millis("1700000000.1"), Some(1_700_000_000_100));
        assert_eq!(parse_epoch_millis("1700000000"), Some(1_700_000_000_000));
        assert_eq!(parse_epoch_millis("1700000000."), Some(1_700_000_000_000));
        assert_eq!(parse_epoch_millis("1.7e9"), Some(1_700_000_000_000));
        assert_eq!(parse_epoch_millis("-1"), None);
        assert_eq!(parse_epoch_millis("NaN"), None);
        assert_eq!(parse_epoch_millis("inf"), None);
        assert_eq!(parse_epoch_millis(""), None);
        assert_eq!(parse_epoch_millis("-"), None);
    }

    #[test]
    fn test_parse_epoch_millis_rejects_out_of_range() {
        assert_eq!(parse_epoch_millis("9223372036854775.807"), Some(i64::MAX));
        assert_eq!(parse_epoch_millis("9223372036854775.808"), None);
        assert_eq!(parse_epoch_millis("9.3e15"), None);
    }

    #[test]
    fn test_v1_schema_maps_full_line() {
        let schema = SchemaVersion::V1.schema();
        let mut fields = vec!["x"; schema.len()];
        fields[0] = "1700000000.250";
        fields[2] = "0.012";
        fields[4] = "1024";
        fields[9] = "300";
        fields[13] = "0.015";
        fields[19] = "CMCD=br%253D3200";
        fields[28] = "-";
        fields[37] = "CloudFront-Viewer-City:Berlin";
        let line = fields.join("\t");

        let mapping = Mapper::new(schema).map(&line);
        assert!(mapping.is_clean(), "{:?}", mapping);
        let record = mapping.record.unwrap();

        assert_eq!(record.timestamp_millis, 1_700_000_000_250);
        // 32 scalar dimensions plus one header dimension
        assert_eq!(record.dimensions.len(), 33);
        assert_eq!(record.dimension("CloudFront_Viewer_City"), Some("Berlin"));
        assert_eq!(record.dimension("cs_headers_count"), Some("x"));
        assert!(record.dimension("cs_uri_query").is_none());
        assert!(record.dimension("cs_headers").is_none());

        let measures: Vec<&str> = record.measures.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            measures,
            vec!["time_to_first_byte", "sc_bytes", "cs_bytes", "time_taken", "cmcd_br"]
        );
    }
}
