//! Writer initialization from runtime configuration

use anyhow::{Context, Result};
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_timestreamwrite::Client;
use cmcd2timestream_config::RuntimeConfig;

use crate::timestream::TimestreamWriter;

/// Build a Timestream client and writer from `config`.
///
/// Without a fixed endpoint the client uses endpoint discovery; the refresh
/// task is spawned on the current Tokio runtime and lives as long as it does.
pub async fn initialize_timestream_writer(config: &RuntimeConfig) -> Result<TimestreamWriter> {
    let target = config.timestream.target()?;
    let client_config = &config.client;

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .retry_config(RetryConfig::standard().with_max_attempts(client_config.max_attempts))
        .timeout_config(
            TimeoutConfig::builder()
                .read_timeout(client_config.read_timeout())
                .build(),
        );
    if let Some(region) = &config.timestream.region {
        loader = loader.region(Region::new(region.clone()));
    }
    let sdk_config = loader.load().await;

    let client = match &config.timestream.endpoint {
        Some(endpoint) => {
            tracing::info!(endpoint = %endpoint, "Using fixed Timestream endpoint");
            let conf = aws_sdk_timestreamwrite::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(conf)
        }
        None => {
            let (client, reload) = Client::new(&sdk_config)
                .with_endpoint_discovery_enabled()
                .await
                .map_err(|e| anyhow::anyhow!("Timestream endpoint discovery failed: {}", e))
                .context("Failed to initialise Timestream client")?;
            tokio::spawn(reload.reload_task());
            client
        }
    };

    tracing::info!(
        database = %target.database,
        table = %target.table,
        region = ?sdk_config.region().map(|r| r.as_ref()),
        max_attempts = client_config.max_attempts,
        read_timeout_secs = client_config.read_timeout_secs,
        "Initialized Timestream writer"
    );

    Ok(TimestreamWriter::new(
        client,
        target,
        config.timestream.measure_name.clone(),
    ))
}
