use cmcd2timestream_batch::{BatchConfig, Batcher};
use cmcd2timestream_core::{decode_payload, Mapper, MappedRecord, SchemaVersion};
use cmcd2timestream_writer::{flush_batch, FlushReport, RecordWriter};
use serde::Serialize;

/// Settings for one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub schema: SchemaVersion,
    pub batch: BatchConfig,
}

/// Counters for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingResult {
    /// Payloads or lines handed to the pipeline.
    pub lines_received: usize,
    /// Payloads that did not decode to a line.
    pub payload_errors: usize,
    /// Records that reached a batch.
    pub records_mapped: usize,
    /// Lines dropped because no timestamp could be read.
    pub records_missing_timestamp: usize,
    /// Schema positions skipped across all lines.
    pub field_errors: usize,
    /// Composite sub-tokens skipped across all lines.
    pub composite_errors: usize,
    pub batches_flushed: usize,
    pub batches_dropped: usize,
    pub records_accepted: usize,
    pub records_rejected: usize,
    /// Records lost with dropped batches.
    pub records_dropped: usize,
    pub flushes: Vec<FlushReport>,
}

impl ProcessingResult {
    fn record_flush(&mut self, report: FlushReport) {
        self.batches_flushed += 1;
        if report.dropped {
            self.batches_dropped += 1;
            self.records_dropped += report.submitted;
        }
        self.records_accepted += report.accepted;
        self.records_rejected += report.rejected;
        self.flushes.push(report);
    }
}

/// Streaming form of the pipeline: push lines one at a time, then finish to
/// flush the final partial batch.
pub struct Processor<'w, W: RecordWriter + ?Sized> {
    mapper: Mapper<'static>,
    batcher: Batcher,
    writer: &'w W,
    result: ProcessingResult,
}

impl<'w, W: RecordWriter + ?Sized> Processor<'w, W> {
    pub fn new(options: PipelineOptions, writer: &'w W) -> Self {
        Self {
            mapper: Mapper::new(options.schema.schema()),
            batcher: Batcher::new(options.batch),
            writer,
            result: ProcessingResult::default(),
        }
    }

    /// Decode a base64 payload and process the line it carries.
    pub async fn push_payload(&mut self, payload: &str) {
        let index = self.result.lines_received;
        match decode_payload(payload) {
            Ok(line) => self.push_line(&line).await,
            Err(err) => {
                self.result.lines_received += 1;
                self.result.payload_errors += 1;
                tracing::warn!(line = index, error = %err, "Skipping undecodable payload");
            }
        }
    }

    /// Map one raw line and batch the resulting record.
    pub async fn push_line(&mut self, line: &str) {
        let index = self.result.lines_received;
        self.result.lines_received += 1;

        let mapping = self.mapper.map(line);
        self.result.field_errors += mapping.field_errors.len();
        self.result.composite_errors += mapping.composite_errors.len();

        match mapping.record {
            Ok(record) => self.enqueue(index, record).await,
            Err(err) => {
                self.result.records_missing_timestamp += 1;
                let reason = mapping
                    .field_errors
                    .iter()
                    .find(|e| e.position() == 0)
                    .map(ToString::to_string);
                tracing::warn!(
                    line = index,
                    error = %err,
                    reason = reason.as_deref().unwrap_or("timestamp field not read"),
                    "Dropping record without timestamp"
                );
            }
        }
    }

    async fn enqueue(&mut self, index: usize, record: MappedRecord) {
        if let Err(err) = self.batcher.add(record) {
            // Only reachable if a full batch was not flushed
            tracing::error!(line = index, error = %err, "Record not batched");
            self.result.records_dropped += 1;
            return;
        }
        self.result.records_mapped += 1;

        if self.batcher.should_flush() {
            self.flush().await;
        }
    }

    async fn flush(&mut self) {
        let batch = self.batcher.drain();
        let report = flush_batch(self.writer, &batch).await;
        self.result.record_flush(report);
    }

    /// Records currently buffered.
    pub fn pending(&self) -> usize {
        self.batcher.len()
    }

    /// Flush any partial batch and return the counters.
    pub async fn finish(mut self) -> ProcessingResult {
        if !self.batcher.is_empty() {
            self.flush().await;
        }

        let result = self.result;
        tracing::info!(
            lines = result.lines_received,
            records = result.records_mapped,
            missing_timestamp = result.records_missing_timestamp,
            payload_errors = result.payload_errors,
            batches = result.batches_flushed,
            accepted = result.records_accepted,
            rejected = result.records_rejected,
            dropped = result.records_dropped,
            "Processing complete"
        );
        result
    }
}

/// Process raw tab-separated lines.
pub async fn process_lines<W, I, S>(lines: I, options: PipelineOptions, writer: &W) -> ProcessingResult
where
    W: RecordWriter + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut processor = Processor::new(options, writer);
    for line in lines {
        processor.push_line(line.as_ref()).await;
    }
    processor.finish().await
}

/// Process base64 stream payloads, each carrying one line.
pub async fn process_payloads<W, I, S>(
    payloads: I,
    options: PipelineOptions,
    writer: &W,
) -> ProcessingResult
where
    W: RecordWriter + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut processor = Processor::new(options, writer);
    for payload in payloads {
        processor.push_payload(payload.as_ref()).await;
    }
    processor.finish().await
}
