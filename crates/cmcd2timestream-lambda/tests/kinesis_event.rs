use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cmcd2timestream_handlers::PipelineOptions;
use cmcd2timestream_lambda::{handle_kinesis_event, KinesisEvent, LambdaState};
use cmcd2timestream_writer::{MemoryWriter, ScriptedResponse, TransportKind};
use std::sync::Arc;

fn log_line(second: usize) -> String {
    let mut fields = vec!["-".to_string(); 40];
    fields[0] = format!("17000000{:02}.250", second);
    fields[1] = "198.51.100.7".to_string();
    fields[3] = "200".to_string();
    fields[19] = "CMCD=bl%253D5000%252Cot%253Dv%252Csid%253Dsession-1".to_string();
    fields.join("\t")
}

fn event(payloads: &[String]) -> KinesisEvent {
    let records: Vec<serde_json::Value> = payloads
        .iter()
        .enumerate()
        .map(|(i, data)| {
            serde_json::json!({
                "eventID": format!("shardId-000000000000:{}", i),
                "kinesis": {
                    "data": data,
                    "partitionKey": "cloudfront",
                    "sequenceNumber": i.to_string(),
                }
            })
        })
        .collect();
    serde_json::from_value(serde_json::json!({ "Records": records })).unwrap()
}

fn state(writer: Arc<MemoryWriter>) -> LambdaState {
    LambdaState::new(writer, PipelineOptions::default())
}

#[tokio::test]
async fn test_event_records_reach_the_writer() {
    let payloads: Vec<String> = (0..3).map(|i| STANDARD.encode(log_line(i))).collect();
    let writer = Arc::new(MemoryWriter::new());

    let result = handle_kinesis_event(event(&payloads), &state(writer.clone())).await;

    assert_eq!(result.lines_received, 3);
    assert_eq!(result.records_accepted, 3);
    assert_eq!(writer.batch_sizes(), vec![3]);

    let batches = writer.batches();
    let record = &batches[0].records()[0];
    assert_eq!(record.timestamp_millis, 1_700_000_000_250);
    assert_eq!(record.dimension("cmcd_sid"), Some("session-1"));
    assert_eq!(record.measure("cmcd_bl").map(|m| m.value.as_str()), Some("5000"));
}

#[tokio::test]
async fn test_bad_payload_does_not_fail_the_invocation() {
    let payloads = vec!["not base64!".to_string(), STANDARD.encode(log_line(1))];
    let writer = Arc::new(MemoryWriter::new());

    let result = handle_kinesis_event(event(&payloads), &state(writer.clone())).await;

    assert_eq!(result.payload_errors, 1);
    assert_eq!(result.records_accepted, 1);
}

#[tokio::test]
async fn test_store_failure_is_reported_not_raised() {
    let payloads: Vec<String> = (0..2).map(|i| STANDARD.encode(log_line(i))).collect();
    let writer = Arc::new(MemoryWriter::with_script([ScriptedResponse::Fail(
        TransportKind::Throttling,
    )]));

    let result = handle_kinesis_event(event(&payloads), &state(writer)).await;

    assert_eq!(result.batches_dropped, 1);
    assert_eq!(result.records_dropped, 2);
    assert_eq!(result.records_accepted, 0);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["records_dropped"], 2);
}

#[tokio::test]
async fn test_empty_event_flushes_nothing() {
    let writer = Arc::new(MemoryWriter::new());
    let result = handle_kinesis_event(KinesisEvent::default(), &state(writer.clone())).await;

    assert_eq!(result.lines_received, 0);
    assert!(writer.batches().is_empty());
}
