//! Submitting one batch and logging what became of it.

use cmcd2timestream_batch::Batch;
use serde::Serialize;

use crate::error::WriterError;
use crate::writer::RecordWriter;

/// What happened to one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    pub sequence: u64,
    pub submitted: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// The whole call failed and the batch was dropped.
    pub dropped: bool,
}

/// Submit `batch` once. Rejections are logged per record and a failed call
/// drops the batch; neither is retried and neither is returned as an error.
pub async fn flush_batch<W>(writer: &W, batch: &Batch) -> FlushReport
where
    W: RecordWriter + ?Sized,
{
    let sequence = batch.sequence();
    let submitted = batch.len();

    match writer.write(batch).await {
        Ok(outcome) => {
            for rejection in &outcome.rejections {
                tracing::warn!(
                    sequence,
                    index = rejection.index,
                    reason = %rejection.reason,
                    existing_version = ?rejection.existing_version,
                    "Record rejected"
                );
            }
            tracing::info!(
                writer = writer.name(),
                sequence,
                batch_size = submitted,
                accepted = outcome.accepted,
                rejected = outcome.rejected(),
                "Flushed batch"
            );
            FlushReport {
                sequence,
                submitted,
                accepted: outcome.accepted,
                rejected: outcome.rejected(),
                dropped: false,
            }
        }
        Err(err) => {
            log_dropped(writer.name(), sequence, submitted, &err);
            FlushReport {
                sequence,
                submitted,
                accepted: 0,
                rejected: 0,
                dropped: true,
            }
        }
    }
}

fn log_dropped(writer: &str, sequence: u64, submitted: usize, err: &WriterError) {
    tracing::error!(
        writer,
        sequence,
        batch_size = submitted,
        code = %err.code(),
        error = %err,
        "Write failed; batch dropped"
    );
}
