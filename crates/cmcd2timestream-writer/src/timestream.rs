//! Amazon Timestream implementation of [`RecordWriter`].

use async_trait::async_trait;
use aws_sdk_timestreamwrite::error::{DisplayErrorContext, SdkError};
use aws_sdk_timestreamwrite::operation::write_records::WriteRecordsError;
use aws_sdk_timestreamwrite::types::RejectedRecord;
use aws_sdk_timestreamwrite::Client;
use cmcd2timestream_batch::Batch;
use cmcd2timestream_config::WriteTarget;

use crate::encoding::encode_records;
use crate::error::{Result, TransportKind, WriterError};
use crate::writer::{RecordWriter, Rejection, WriteOutcome};

/// Writes each batch with a single `WriteRecords` call.
///
/// Retries, backoff and timeouts belong to the client configuration; this
/// writer makes exactly one call per batch.
#[derive(Debug, Clone)]
pub struct TimestreamWriter {
    client: Client,
    database: String,
    table: String,
    measure_name: String,
}

impl TimestreamWriter {
    pub fn new(client: Client, target: WriteTarget, measure_name: impl Into<String>) -> Self {
        Self {
            client,
            database: target.database,
            table: target.table,
            measure_name: measure_name.into(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl RecordWriter for TimestreamWriter {
    async fn write(&self, batch: &Batch) -> Result<WriteOutcome> {
        let records = encode_records(batch.records(), &self.measure_name)?;
        let submitted = records.len();

        let response = self
            .client
            .write_records()
            .database_name(&self.database)
            .table_name(&self.table)
            .set_records(Some(records))
            .send()
            .await;

        match response {
            Ok(output) => {
                if let Some(ingested) = output.records_ingested() {
                    tracing::trace!(
                        total = ingested.total(),
                        memory_store = ingested.memory_store(),
                        magnetic_store = ingested.magnetic_store(),
                        "Records ingested"
                    );
                }
                Ok(WriteOutcome::accepted_all(submitted))
            }
            Err(err) => classify_error(err, submitted, &self.database, &self.table),
        }
    }

    fn name(&self) -> &'static str {
        "timestream"
    }
}

/// Split a failed call into a partial rejection (an outcome) or a whole-call
/// transport failure.
fn classify_error<R>(
    err: SdkError<WriteRecordsError, R>,
    submitted: usize,
    database: &str,
    table: &str,
) -> Result<WriteOutcome>
where
    R: std::fmt::Debug,
{
    match err {
        SdkError::ServiceError(context) => {
            let service_error = context.into_err();
            if let WriteRecordsError::RejectedRecordsException(rejected) = &service_error {
                let rejections = rejected
                    .rejected_records()
                    .iter()
                    .map(rejection_from_sdk)
                    .collect();
                return Ok(WriteOutcome::partial(submitted, rejections));
            }

            let kind = service_error_kind(&service_error);
            Err(WriterError::transport(
                kind,
                database,
                table,
                DisplayErrorContext(&service_error).to_string(),
            ))
        }
        other => Err(WriterError::transport(
            TransportKind::Network,
            database,
            table,
            DisplayErrorContext(&other).to_string(),
        )),
    }
}

fn service_error_kind(err: &WriteRecordsError) -> TransportKind {
    match err {
        WriteRecordsError::ThrottlingException(_) => TransportKind::Throttling,
        WriteRecordsError::AccessDeniedException(_) => TransportKind::AccessDenied,
        WriteRecordsError::ResourceNotFoundException(_) => TransportKind::NotFound,
        WriteRecordsError::ValidationException(_) => TransportKind::Validation,
        _ => TransportKind::Service,
    }
}

fn rejection_from_sdk(record: &RejectedRecord) -> Rejection {
    Rejection {
        index: usize::try_from(record.record_index()).unwrap_or(usize::MAX),
        reason: record
            .reason()
            .unwrap_or("no reason given")
            .to_string(),
        existing_version: record.existing_version(),
    }
}
