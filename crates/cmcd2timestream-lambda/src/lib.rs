// AWS Lambda runtime adapter
//
// Invoked by a Kinesis Data Streams trigger carrying CloudFront real-time log
// lines. Each invocation runs its records through the shared pipeline and
// returns the processing counters as JSON.
//
// lambda_runtime brings the tokio runtime; no extra runtime is configured here.

use anyhow::Context;
use cmcd2timestream_config::RuntimeConfig;
use cmcd2timestream_handlers::{PipelineOptions, ProcessingResult};
use cmcd2timestream_writer::{initialize_timestream_writer, RecordWriter};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::Instrument;

mod event;
mod handlers;
mod init;

pub use event::{KinesisEvent, KinesisEventRecord, KinesisRecord};
pub use handlers::handle_kinesis_event;

/// State shared by every invocation of a warm container.
#[derive(Clone)]
pub struct LambdaState {
    pub writer: Arc<dyn RecordWriter>,
    pub options: PipelineOptions,
}

impl LambdaState {
    pub fn new(writer: Arc<dyn RecordWriter>, options: PipelineOptions) -> Self {
        Self { writer, options }
    }

    async fn from_config(config: &RuntimeConfig) -> anyhow::Result<Self> {
        config
            .schema
            .version
            .schema()
            .validate()
            .context("Field schema failed validation")?;
        let options = PipelineOptions {
            schema: config.schema.version,
            batch: config.batch_config()?,
        };
        let writer = initialize_timestream_writer(config)
            .await
            .context("Failed to initialize Timestream writer")?;
        Ok(Self::new(Arc::new(writer), options))
    }
}

async fn handle_request(
    event: LambdaEvent<KinesisEvent>,
    state: Arc<LambdaState>,
) -> Result<ProcessingResult, Error> {
    let (payload, context) = event.into_parts();
    let span = tracing::info_span!("invocation", request_id = %context.request_id);
    Ok(handle_kinesis_event(payload, &state).instrument(span).await)
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    let config = RuntimeConfig::load()
        .map_err(|e| Error::from(format!("Failed to load configuration: {:#}", e)))?;
    init::init_tracing(&config);

    tracing::info!(
        schema = %config.schema.version,
        batch_size = config.batch.max_records,
        "Starting cmcd2timestream Lambda"
    );

    let state = Arc::new(
        LambdaState::from_config(&config)
            .await
            .map_err(|e| Error::from(format!("{:#}", e)))?,
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<KinesisEvent>| {
        let state = state.clone();
        async move { handle_request(event, state).await }
    }))
    .await
}
