// Kinesis Data Streams trigger payload
//
// Only the fields the pipeline reads are modelled; everything else in the
// event is ignored on deserialization.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KinesisEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<KinesisEventRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesisEventRecord {
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,

    pub kinesis: KinesisRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesisRecord {
    /// Base64 payload, one log line per record.
    pub data: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_arrival_timestamp: Option<f64>,
}
