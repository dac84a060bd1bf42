// Human-readable rendering of a field schema

use cmcd2timestream_core::schema::{FieldKind, FieldRole};
use cmcd2timestream_core::SchemaVersion;
use std::fmt::Write;

fn role_label(role: FieldRole) -> &'static str {
    match role {
        FieldRole::Dimension => "dimension",
        FieldRole::Measure => "measure",
        FieldRole::Timestamp => "timestamp",
    }
}

fn kind_label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Scalar => "scalar",
        FieldKind::Composite(_) => "composite",
        FieldKind::Ignored => "ignored",
    }
}

/// Render the positional field table, header allow-list and telemetry keys
/// of `version`.
pub fn render_schema(version: SchemaVersion) -> String {
    let schema = version.schema();
    let mut out = String::new();

    let _ = writeln!(out, "schema {} ({} fields)", version, schema.len());
    let _ = writeln!(
        out,
        "{:>3}  {:<34} {:<10} {:<10} {:<10} output",
        "pos", "field", "kind", "role", "type"
    );
    for (position, field) in schema.fields().iter().enumerate() {
        let (role, value_type, output) = match field.kind {
            FieldKind::Scalar => (
                role_label(field.role),
                field.value_type.as_store_type(),
                field.output_name(),
            ),
            FieldKind::Composite(_) | FieldKind::Ignored => ("-", "-", "-".to_string()),
        };
        let _ = writeln!(
            out,
            "{:>3}  {:<34} {:<10} {:<10} {:<10} {}",
            position,
            field.name,
            kind_label(field.kind),
            role,
            value_type,
            output
        );
    }

    let _ = writeln!(out, "\nheaders (dimensions)");
    for header in schema.header_allow_list() {
        let _ = writeln!(out, "  {}", header);
    }

    let _ = writeln!(out, "\ntelemetry keys");
    for key in schema.telemetry_keys() {
        let _ = writeln!(
            out,
            "  {:<4} {:<10} {:<10} {}",
            key.key,
            role_label(key.role),
            key.value_type.as_store_type(),
            key.output_name()
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_table_lists_every_position() {
        let table = render_schema(SchemaVersion::V1);
        assert!(table.starts_with("schema v1 (40 fields)"));
        assert!(table.contains("timestamp"));
        assert!(table.contains("cs-uri-query"));
        assert!(table.contains("CloudFront-Is-Mobile-Viewer"));
        assert!(table.contains("cmcd_br"));
    }

    #[test]
    fn test_v2_marks_query_ignored() {
        let table = render_schema(SchemaVersion::V2);
        let query_row = table
            .lines()
            .find(|line| line.contains("cs-uri-query"))
            .unwrap();
        assert!(query_row.contains("ignored"));
        assert!(table.contains("cmcd-encoded-bitrate"));
    }
}
