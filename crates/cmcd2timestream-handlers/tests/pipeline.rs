use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cmcd2timestream_batch::BatchConfig;
use cmcd2timestream_core::SchemaVersion;
use cmcd2timestream_handlers::{process_lines, process_payloads, PipelineOptions, Processor};
use cmcd2timestream_writer::{MemoryWriter, ScriptedResponse, TransportKind};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn line(n: usize) -> String {
    let mut fields = vec!["-".to_string(); 40];
    fields[0] = format!("1700000000.{:03}", n % 1000);
    fields[1] = format!("192.0.2.{}", n % 250);
    fields[3] = "200".to_string();
    fields[4] = (1000 + n).to_string();
    fields[19] = "CMCD=br%253D3200%252Csid%253Dabc".to_string();
    fields[37] = "CloudFront-Is-Mobile-Viewer:true%0A".to_string();
    fields.join("\t")
}

fn lines(count: usize) -> Vec<String> {
    (0..count).map(line).collect()
}

#[tokio::test]
async fn test_250_lines_flush_as_100_100_50() {
    let writer = MemoryWriter::new();
    let result = process_lines(lines(250), PipelineOptions::default(), &writer).await;

    assert_eq!(writer.batch_sizes(), vec![100, 100, 50]);
    assert_eq!(result.lines_received, 250);
    assert_eq!(result.records_mapped, 250);
    assert_eq!(result.batches_flushed, 3);
    assert_eq!(result.records_accepted, 250);
    assert_eq!(result.field_errors, 0);

    let sequences: Vec<u64> = result.flushes.iter().map(|f| f.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2]);

    // input order is kept within and across batches
    let batches = writer.batches();
    let first_of_second = &batches[1].records()[0];
    assert_eq!(first_of_second.dimension("c_ip"), Some("192.0.2.100"));
}

#[tokio::test]
async fn test_exact_quota_has_no_trailing_flush() {
    let writer = MemoryWriter::new();
    process_lines(lines(200), PipelineOptions::default(), &writer).await;
    assert_eq!(writer.batch_sizes(), vec![100, 100]);
}

#[tokio::test]
async fn test_rejections_do_not_affect_next_batch() {
    let writer = MemoryWriter::with_script([ScriptedResponse::Reject(vec![
        (3, "Duplicate record".to_string()),
        (7, "Value out of range".to_string()),
    ])]);

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let result = process_lines(lines(150), PipelineOptions::default(), &writer).await;

    let rejected: Vec<String> = logs
        .lines()
        .into_iter()
        .filter(|line| line.contains("Record rejected"))
        .collect();
    assert_eq!(rejected.len(), 2);
    assert!(rejected[0].contains("index=3"));
    assert!(rejected[0].contains("reason=Duplicate record"));
    assert!(rejected[1].contains("index=7"));
    assert!(rejected[1].contains("reason=Value out of range"));
    assert!(rejected.iter().all(|line| line.contains("WARN")));

    assert_eq!(writer.batch_sizes(), vec![100, 50]);
    assert_eq!(result.records_rejected, 2);
    assert_eq!(result.records_accepted, 98 + 50);
    assert_eq!(result.batches_dropped, 0);
    assert_eq!(result.flushes[0].rejected, 2);
    assert_eq!(result.flushes[1].rejected, 0);
}

#[tokio::test]
async fn test_transport_failure_drops_batch_and_continues() {
    let writer = MemoryWriter::with_script([
        ScriptedResponse::AcceptAll,
        ScriptedResponse::Fail(TransportKind::Throttling),
    ]);

    let result = process_lines(lines(250), PipelineOptions::default(), &writer).await;

    assert_eq!(writer.batch_sizes(), vec![100, 100, 50]);
    assert_eq!(result.batches_dropped, 1);
    assert_eq!(result.records_dropped, 100);
    assert_eq!(result.records_accepted, 150);
    assert!(result.flushes[1].dropped);
}

#[tokio::test]
async fn test_bad_payloads_and_missing_timestamps_are_counted() {
    let mut payloads: Vec<String> = lines(3).iter().map(|l| STANDARD.encode(l)).collect();
    payloads.push("%%% not base64 %%%".to_string());
    payloads.push(STANDARD.encode(line(9).replacen("1700000000.009", "-", 1)));

    let writer = MemoryWriter::new();
    let result = process_payloads(&payloads, PipelineOptions::default(), &writer).await;

    assert_eq!(result.lines_received, 5);
    assert_eq!(result.payload_errors, 1);
    assert_eq!(result.records_missing_timestamp, 1);
    assert_eq!(result.field_errors, 1);
    assert_eq!(result.records_mapped, 3);
    assert_eq!(writer.batch_sizes(), vec![3]);
}

#[tokio::test]
async fn test_empty_input_writes_nothing() {
    let writer = MemoryWriter::new();
    let result = process_lines(Vec::<String>::new(), PipelineOptions::default(), &writer).await;
    assert_eq!(result.batches_flushed, 0);
    assert!(writer.batches().is_empty());
}

#[tokio::test]
async fn test_streaming_processor_with_smaller_batches() {
    let writer = MemoryWriter::new();
    let options = PipelineOptions {
        schema: SchemaVersion::V1,
        batch: BatchConfig::new(2).unwrap(),
    };

    let mut processor = Processor::new(options, &writer);
    for line in lines(5) {
        processor.push_line(&line).await;
    }
    assert_eq!(processor.pending(), 1);
    let result = processor.finish().await;

    assert_eq!(writer.batch_sizes(), vec![2, 2, 1]);
    assert_eq!(result.batches_flushed, 3);
}

#[tokio::test]
async fn test_records_carry_decoded_telemetry() {
    let writer = MemoryWriter::new();
    process_lines(lines(1), PipelineOptions::default(), &writer).await;

    let batches = writer.batches();
    let record = &batches[0].records()[0];
    assert_eq!(record.timestamp_millis, 1_700_000_000_000);
    assert_eq!(record.measure("cmcd_br").map(|m| m.value.as_str()), Some("3200"));
    assert_eq!(record.dimension("cmcd_sid"), Some("abc"));
    assert_eq!(record.dimension("CloudFront_Is_Mobile_Viewer"), Some("true"));
    assert!(record.measure("sc_content_len").is_none());

    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["timestamp_millis"], 1_700_000_000_000_i64);
}
