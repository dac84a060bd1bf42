use crate::event::KinesisEvent;
use crate::LambdaState;
use cmcd2timestream_handlers::{ProcessingResult, Processor};
use tracing::Instrument;

/// Run every record of a Kinesis event through the pipeline.
///
/// Store failures are reported in the result, never returned as errors.
pub async fn handle_kinesis_event(event: KinesisEvent, state: &LambdaState) -> ProcessingResult {
    tracing::debug!(records = event.records.len(), "Received Kinesis event");

    let mut processor = Processor::new(state.options, state.writer.as_ref());
    for record in &event.records {
        let span = tracing::debug_span!(
            "kinesis_record",
            sequence_number = record.kinesis.sequence_number.as_deref().unwrap_or("-"),
            partition_key = record.kinesis.partition_key.as_deref().unwrap_or("-"),
        );
        processor
            .push_payload(&record.kinesis.data)
            .instrument(span)
            .await;
    }
    processor.finish().await
}
