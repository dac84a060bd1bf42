//! Dry-run writer that prints each record as one JSON object per line.

use std::io::Write;

use async_trait::async_trait;
use cmcd2timestream_batch::Batch;
use parking_lot::Mutex;

use crate::encoding::WireRecord;
use crate::error::{Result, TransportKind, WriterError};
use crate::writer::{RecordWriter, WriteOutcome};

pub struct JsonLinesWriter<W> {
    out: Mutex<W>,
    measure_name: String,
}

impl<W: Write + Send> JsonLinesWriter<W> {
    pub fn new(out: W, measure_name: impl Into<String>) -> Self {
        Self {
            out: Mutex::new(out),
            measure_name: measure_name.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W: Write + Send> RecordWriter for JsonLinesWriter<W> {
    async fn write(&self, batch: &Batch) -> Result<WriteOutcome> {
        let mut out = self.out.lock();
        for record in batch.records() {
            let wire = WireRecord::from_mapped(record, &self.measure_name);
            serde_json::to_writer(&mut *out, &wire)
                .map_err(|e| io_failure(e.to_string()))?;
            out.write_all(b"\n").map_err(|e| io_failure(e.to_string()))?;
        }
        out.flush().map_err(|e| io_failure(e.to_string()))?;
        Ok(WriteOutcome::accepted_all(batch.len()))
    }

    fn name(&self) -> &'static str {
        "json-lines"
    }
}

fn io_failure(reason: String) -> WriterError {
    WriterError::transport(TransportKind::Network, "stdout", "stdout", reason)
}
