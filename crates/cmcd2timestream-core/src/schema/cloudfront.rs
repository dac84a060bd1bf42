// CloudFront real-time log field layout shared by every schema version.
//
// Order must match the real-time log configuration exactly. The query-string
// position is supplied by the caller so each version decides whether it is
// decoded for telemetry or only consumed; extra fields are appended after
// `cs-headers-count`.

macro_rules! cloudfront_fields {
    ($uri_query:expr $(, $extra:expr)* $(,)?) => {
        [
            FieldDescriptor::timestamp("timestamp"),
            FieldDescriptor::dimension("c-ip"),
            FieldDescriptor::measure("time-to-first-byte", ValueType::Float),
            FieldDescriptor::dimension("sc-status"),
            FieldDescriptor::measure("sc-bytes", ValueType::Integer),
            FieldDescriptor::dimension("cs-method"),
            FieldDescriptor::dimension("cs-protocol"),
            FieldDescriptor::dimension("cs-host"),
            FieldDescriptor::dimension("cs-uri-stem"),
            FieldDescriptor::measure("cs-bytes", ValueType::Integer),
            FieldDescriptor::dimension("x-edge-location"),
            FieldDescriptor::dimension("x-edge-request-id"),
            FieldDescriptor::dimension("x-host-header"),
            FieldDescriptor::measure("time-taken", ValueType::Float),
            FieldDescriptor::dimension("cs-protocol-version"),
            FieldDescriptor::dimension("c-ip-version"),
            FieldDescriptor::dimension("cs-user-agent"),
            FieldDescriptor::dimension("cs-referer"),
            FieldDescriptor::dimension("cs-cookie"),
            $uri_query,
            FieldDescriptor::dimension("x-edge-response-result-type"),
            FieldDescriptor::dimension("x-forwarded-for"),
            FieldDescriptor::dimension("ssl-protocol"),
            FieldDescriptor::dimension("ssl-cipher"),
            FieldDescriptor::dimension("x-edge-result-type"),
            FieldDescriptor::dimension("fle-encrypted-fields"),
            FieldDescriptor::dimension("fle-status"),
            FieldDescriptor::dimension("sc-content-type"),
            // '-' for compressed responses
            FieldDescriptor::measure("sc-content-len", ValueType::Integer),
            FieldDescriptor::dimension("sc-range-start"),
            FieldDescriptor::dimension("sc-range-end"),
            FieldDescriptor::dimension("c-port"),
            FieldDescriptor::dimension("x-edge-detailed-result-type"),
            FieldDescriptor::dimension("c-country"),
            FieldDescriptor::dimension("cs-accept-encoding"),
            FieldDescriptor::dimension("cs-accept"),
            FieldDescriptor::dimension("cache-behavior-path-pattern"),
            FieldDescriptor::composite("cs-headers", CompositeKind::Headers),
            FieldDescriptor::dimension("cs-header-names"),
            FieldDescriptor::dimension("cs-headers-count"),
            $($extra,)*
        ]
    };
}
