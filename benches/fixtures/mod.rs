// Synthetic CloudFront real-time log lines for benchmarking
//
// Lines follow the v1 field layout; v2 lines append the first-class CMCD
// fields CloudFront emits directly.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cmcd2timestream_core::SchemaVersion;

/// Workload size presets
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)]
pub enum WorkloadSize {
    Small,  // 1k lines
    Medium, // 10k lines
    Large,  // 100k lines
}

impl WorkloadSize {
    pub fn line_count(&self) -> usize {
        match self {
            WorkloadSize::Small => 1_000,
            WorkloadSize::Medium => 10_000,
            WorkloadSize::Large => 100_000,
        }
    }
}

fn v1_fields(n: usize) -> Vec<String> {
    let seconds = 1_700_000_000 + n / 1000;
    vec![
        format!("{}.{:03}", seconds, n % 1000),
        format!("192.0.2.{}", n % 250),
        "0.012".to_string(),
        "200".to_string(),
        (180_000 + n).to_string(),
        "GET".to_string(),
        "https".to_string(),
        "d111111abcdef8.cloudfront.net".to_string(),
        format!("/vod/segment_{}.m4s", n % 600),
        "842".to_string(),
        "SEA19-C1".to_string(),
        format!("req-{:08x}", n),
        "d111111abcdef8.cloudfront.net".to_string(),
        "0.021".to_string(),
        "HTTP/2.0".to_string(),
        "IPv4".to_string(),
        "Mozilla/5.0%20(Macintosh;%20Intel%20Mac%20OS%20X%2010_15_7)".to_string(),
        "-".to_string(),
        "-".to_string(),
        format!(
            "CMCD=bl%253D{}%252Cbr%253D3200%252Cd%253D4004%252Cmtp%253D25400%252Cot%253Dv%252Csf%253Dh%252Csid%253D6e2fb550%252Ctb%253D6000",
            n % 30_000
        ),
        "Hit".to_string(),
        "-".to_string(),
        "TLSv1.3".to_string(),
        "TLS_AES_128_GCM_SHA256".to_string(),
        "Hit".to_string(),
        "-".to_string(),
        "-".to_string(),
        "video/mp4".to_string(),
        "179321".to_string(),
        "-".to_string(),
        "-".to_string(),
        "51234".to_string(),
        "Hit".to_string(),
        "US".to_string(),
        "gzip,%20deflate,%20br".to_string(),
        "-".to_string(),
        "-".to_string(),
        "Host:d111111abcdef8.cloudfront.net%0ACloudFront-Is-Mobile-Viewer:false%0ACloudFront-Viewer-City:Seattle%0A".to_string(),
        "Host%0ACloudFront-Is-Mobile-Viewer%0ACloudFront-Viewer-City%0A".to_string(),
        "3".to_string(),
    ]
}

const V2_CMCD: [&str; 18] = [
    "3200", "21300", "false", "movie-1", "4004", "-", "25400", "-", "-", "v", "1", "-", "h",
    "6e2fb550", "v", "false", "6000", "1",
];

/// One log line of the given version.
pub fn log_line(n: usize, version: SchemaVersion) -> String {
    let mut fields = v1_fields(n);
    if version == SchemaVersion::V2 {
        fields.extend(V2_CMCD.iter().map(|v| v.to_string()));
    }
    fields.join("\t")
}

pub fn log_lines(size: WorkloadSize, version: SchemaVersion) -> Vec<String> {
    (0..size.line_count()).map(|n| log_line(n, version)).collect()
}

/// Lines as base64 stream payloads.
pub fn payloads(size: WorkloadSize, version: SchemaVersion) -> Vec<String> {
    log_lines(size, version)
        .iter()
        .map(|line| STANDARD.encode(line))
        .collect()
}
