use super::{LogFormat, RuntimeConfig};
use anyhow::{anyhow, Context, Result};
use cmcd2timestream_core::SchemaVersion;

pub const ENV_PREFIX: &str = "CMCD2TIMESTREAM_";

/// Abstraction over environment-variable lookups so tests and embedding
/// runtimes can supply their own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the CMCD2TIMESTREAM_ prefix
    /// Used for AWS standard variables and the deployment's table variables
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Unprefixed names set by the deployment template; prefixed ones win
    if let Some(database) = get_raw_env_string(env, "timestream_database")? {
        config.timestream.database = Some(database);
    }
    if let Some(table) = get_raw_env_string(env, "timestream_table")? {
        config.timestream.table = Some(table);
    }
    if config.timestream.region.is_none() {
        if let Some(region) = get_raw_env_string(env, "AWS_REGION")? {
            config.timestream.region = Some(region);
        }
    }

    // Write target
    if let Some(database) = get_env_string(env, "DATABASE")? {
        config.timestream.database = Some(database);
    }
    if let Some(table) = get_env_string(env, "TABLE")? {
        config.timestream.table = Some(table);
    }
    if let Some(region) = get_env_string(env, "REGION")? {
        config.timestream.region = Some(region);
    }
    if let Some(endpoint) = get_env_string(env, "ENDPOINT")? {
        config.timestream.endpoint = Some(endpoint);
    }
    if let Some(measure_name) = get_env_string(env, "MEASURE_NAME")? {
        config.timestream.measure_name = measure_name;
    }

    // Store client
    if let Some(val) = get_env_u32(env, "MAX_ATTEMPTS")? {
        config.client.max_attempts = val;
    }
    if let Some(val) = get_env_u64(env, "READ_TIMEOUT_SECS")? {
        config.client.read_timeout_secs = val;
    }
    if let Some(val) = get_env_usize(env, "MAX_POOL_CONNECTIONS")? {
        config.client.max_pool_connections = val;
    }

    // Batching
    if let Some(val) = get_env_usize(env, "BATCH_MAX_RECORDS")? {
        config.batch.max_records = val;
    }

    // Field schema
    if let Some(version) = get_env_string(env, "SCHEMA_VERSION")? {
        config.schema.version = version
            .parse::<SchemaVersion>()
            .context("Invalid CMCD2TIMESTREAM_SCHEMA_VERSION value")?;
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL")? {
        config.log.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT")? {
        config.log.format = Some(
            format
                .parse::<LogFormat>()
                .context("Invalid CMCD2TIMESTREAM_LOG_FORMAT value")?,
        );
    }

    Ok(())
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Result<Option<String>> {
    Ok(env.get(key).filter(|v| !v.is_empty()))
}

fn get_raw_env_string<E: EnvSource>(env: &E, key: &str) -> Result<Option<String>> {
    Ok(env.get_raw(key).filter(|v| !v.is_empty()))
}

fn get_env_parsed<E, T>(env: &E, key: &str) -> Result<Option<T>>
where
    E: EnvSource,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_string(env, key)? {
        Some(val) => {
            let parsed = val
                .trim()
                .parse::<T>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    get_env_parsed(env, key)
}

fn get_env_u64<E: EnvSource>(env: &E, key: &str) -> Result<Option<u64>> {
    get_env_parsed(env, key)
}

fn get_env_u32<E: EnvSource>(env: &E, key: &str) -> Result<Option<u32>> {
    get_env_parsed(env, key)
}
