// Lookup tables for the composite decoders.

use super::{FieldRole, ValueType};

/// Prefix applied to every telemetry key recorded from a query string.
pub const TELEMETRY_PREFIX: &str = "cmcd";

/// A recognised key of the `CMCD` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryKey {
    pub key: &'static str,
    pub value_type: ValueType,
    pub role: FieldRole,
}

impl TelemetryKey {
    const fn dimension(key: &'static str, value_type: ValueType) -> Self {
        Self {
            key,
            value_type,
            role: FieldRole::Dimension,
        }
    }

    const fn measure(key: &'static str, value_type: ValueType) -> Self {
        Self {
            key,
            value_type,
            role: FieldRole::Measure,
        }
    }

    /// Namespaced output name, e.g. `cmcd_bl`.
    pub fn output_name(&self) -> String {
        format!("{}_{}", TELEMETRY_PREFIX, self.key)
    }
}

/// CMCD keys supported by the player, with the role each takes in the point.
pub static CMCD_KEYS: [TelemetryKey; 17] = [
    // Encoded bitrate, kbps
    TelemetryKey::measure("br", ValueType::Integer),
    // Content ID
    TelemetryKey::dimension("cid", ValueType::Text),
    // Buffer length, ms
    TelemetryKey::measure("bl", ValueType::Integer),
    // Object duration, ms
    TelemetryKey::measure("d", ValueType::Integer),
    // Deadline, ms
    TelemetryKey::measure("dl", ValueType::Integer),
    // Measured throughput, kbps
    TelemetryKey::measure("mtp", ValueType::Integer),
    // Object type
    TelemetryKey::dimension("ot", ValueType::Text),
    // Playback rate
    TelemetryKey::dimension("pr", ValueType::Integer),
    // Requested maximum throughput, kbps
    TelemetryKey::measure("rtp", ValueType::Integer),
    // Streaming format
    TelemetryKey::dimension("sf", ValueType::Text),
    // Session ID
    TelemetryKey::dimension("sid", ValueType::Text),
    // Stream type
    TelemetryKey::dimension("st", ValueType::Text),
    // Startup
    TelemetryKey::dimension("su", ValueType::Text),
    // Buffer starvation
    TelemetryKey::measure("bs", ValueType::Boolean),
    // Top bitrate, kbps
    TelemetryKey::measure("tb", ValueType::Integer),
    // Next object request
    TelemetryKey::dimension("nor", ValueType::Text),
    // Next range request
    TelemetryKey::dimension("nrr", ValueType::Text),
];

/// Viewer headers recorded as dimensions.
pub static SUPPORTED_HEADERS: [&str; 7] = [
    "CloudFront-Is-IOS-Viewer",
    "CloudFront-Is-Tablet-Viewer",
    "CloudFront-Is-Mobile-Viewer",
    "CloudFront-Viewer-City",
    "CloudFront-Is-SmartTV-Viewer",
    "CloudFront-Is-Android-Viewer",
    "CloudFront-Is-Desktop-Viewer",
];
