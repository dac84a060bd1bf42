// Configuration validation
//
// Validates that values are sensible. The write target is checked where it is
// needed, so a dry run can work without one.

use crate::*;
use anyhow::{bail, Result};
use cmcd2timestream_batch::RECORD_QUOTA;
use tracing::warn;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_timestream_config(&config.timestream)?;
    validate_client_config(&config.client)?;
    validate_batch_config(&config.batch)?;
    validate_log_config(&config.log)?;
    Ok(())
}

fn validate_timestream_config(config: &TimestreamConfig) -> Result<()> {
    if matches!(config.database.as_deref(), Some(d) if d.trim().is_empty()) {
        bail!("timestream.database must not be empty");
    }

    if matches!(config.table.as_deref(), Some(t) if t.trim().is_empty()) {
        bail!("timestream.table must not be empty");
    }

    if config.measure_name.trim().is_empty() {
        bail!("timestream.measure_name must not be empty");
    }

    if let Some(endpoint) = &config.endpoint {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            bail!("timestream.endpoint must be an http(s) URL, got '{}'", endpoint);
        }
    }

    Ok(())
}

fn validate_client_config(config: &ClientConfig) -> Result<()> {
    if config.max_attempts == 0 {
        bail!("client.max_attempts must be greater than 0");
    }

    if config.read_timeout_secs == 0 {
        bail!("client.read_timeout_secs must be greater than 0");
    }

    if config.max_pool_connections == 0 {
        bail!("client.max_pool_connections must be greater than 0");
    }

    if config.max_attempts > 25 {
        warn!(
            max_attempts = config.max_attempts,
            "client.max_attempts is very large; throttled batches may hold the invocation open"
        );
    }

    Ok(())
}

fn validate_batch_config(config: &BatchConfig) -> Result<()> {
    if config.max_records == 0 {
        bail!("batch.max_records must be greater than 0");
    }

    if config.max_records > RECORD_QUOTA {
        bail!(
            "batch.max_records must not exceed the per-call quota of {} (got {})",
            RECORD_QUOTA,
            config.max_records
        );
    }

    Ok(())
}

fn validate_log_config(config: &LogConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("log.level must not be empty");
    }

    Ok(())
}
