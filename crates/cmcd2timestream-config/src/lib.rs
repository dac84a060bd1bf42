// cmcd2timestream-config - Runtime configuration for the Lambda and CLI
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from CMCD2TIMESTREAM_CONFIG env var
// 3. Config file contents from CMCD2TIMESTREAM_CONFIG_CONTENT env var
// 4. Default config file locations (./config.toml, ./.cmcd2timestream.toml)
// 5. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use cmcd2timestream_batch::RECORD_QUOTA;
use cmcd2timestream_core::SchemaVersion;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod env_overrides;
mod platform;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};
pub use platform::{Platform, PlatformDefaults};

/// Main runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub timestream: TimestreamConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub schema: SchemaConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Write target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestreamConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Falls back to the SDK's region chain when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Fixed endpoint; disables endpoint discovery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_measure_name")]
    pub measure_name: String,
}

fn default_measure_name() -> String {
    "MULTI".to_string()
}

impl Default for TimestreamConfig {
    fn default() -> Self {
        Self {
            database: None,
            table: None,
            region: None,
            endpoint: None,
            measure_name: default_measure_name(),
        }
    }
}

/// A resolved database/table pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTarget {
    pub database: String,
    pub table: String,
}

impl TimestreamConfig {
    /// Database and table, required by anything that actually writes.
    pub fn target(&self) -> Result<WriteTarget> {
        let database = self
            .database
            .clone()
            .filter(|d| !d.is_empty())
            .with_context(|| {
                format!(
                    "timestream.database is required (set {}DATABASE or timestream_database)",
                    ENV_PREFIX
                )
            })?;
        let table = self
            .table
            .clone()
            .filter(|t| !t.is_empty())
            .with_context(|| {
                format!(
                    "timestream.table is required (set {}TABLE or timestream_table)",
                    ENV_PREFIX
                )
            })?;
        Ok(WriteTarget { database, table })
    }
}

/// Store client retry, timeout and pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub max_attempts: u32,
    pub read_timeout_secs: u64,
    /// Validated but not applied to the client; the SDK's HTTP client sizes
    /// its own pool.
    pub max_pool_connections: usize,
}

impl ClientConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            read_timeout_secs: 20,
            max_pool_connections: 5000,
        }
    }
}

/// Batch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub max_records: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_records: RECORD_QUOTA,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub version: SchemaVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Platform default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<LogFormat>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load configuration from a specific file path (for CLI usage).
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Build a configuration from inline TOML plus overrides supplied by an
    /// `EnvSource`, without touching the host environment or filesystem.
    pub fn load_with_env<E: EnvSource>(inline_config: Option<&str>, env: &E) -> Result<Self> {
        let mut config = RuntimeConfig::default();

        if let Some(inline) = inline_config {
            let file_config: RuntimeConfig =
                toml::from_str(inline).context("Failed to parse inline config content")?;
            config.merge(file_config);
        }

        config.apply_env_overrides_from(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge another config into this one (used for TOML layering).
    pub fn merge(&mut self, other: RuntimeConfig) {
        self.timestream = other.timestream;
        self.client = other.client;
        self.batch = other.batch;
        self.schema = other.schema;
        self.log = other.log;
    }

    /// Apply environment overrides from a custom source.
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    /// Log format, falling back to the platform default.
    pub fn log_format(&self, platform: Platform) -> LogFormat {
        self.log
            .format
            .unwrap_or_else(|| platform.defaults().log_format)
    }

    /// Batcher settings derived from `[batch]`.
    pub fn batch_config(&self) -> Result<cmcd2timestream_batch::BatchConfig> {
        cmcd2timestream_batch::BatchConfig::new(self.batch.max_records)
            .context("Invalid batch.max_records")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_default_configs() {
        let config = RuntimeConfig::default();
        assert_eq!(config.timestream.measure_name, "MULTI");
        assert_eq!(config.client.max_attempts, 10);
        assert_eq!(config.client.read_timeout(), Duration::from_secs(20));
        assert_eq!(config.client.max_pool_connections, 5000);
        assert_eq!(config.batch.max_records, 100);
        assert_eq!(config.schema.version, SchemaVersion::V1);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log_format(Platform::Lambda), LogFormat::Json);
        assert_eq!(config.log_format(Platform::Local), LogFormat::Text);
        assert_eq!(config.batch_config().unwrap().max_records, 100);
    }

    #[test]
    fn test_partial_toml_keeps_section_defaults() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [timestream]
            database = "cmcd"
            table = "requests"

            [schema]
            version = "v2"
            "#,
        )
        .unwrap();

        assert_eq!(config.timestream.measure_name, "MULTI");
        assert_eq!(config.client, ClientConfig::default());
        assert_eq!(config.schema.version, SchemaVersion::V2);
        assert_eq!(
            config.timestream.target().unwrap(),
            WriteTarget {
                database: "cmcd".to_string(),
                table: "requests".to_string(),
            }
        );
    }

    #[test]
    fn test_target_requires_database_and_table() {
        let mut timestream = TimestreamConfig::default();
        assert!(timestream.target().is_err());

        timestream.database = Some("cmcd".to_string());
        timestream.table = Some(String::new());
        let err = timestream.target().unwrap_err().to_string();
        assert!(err.contains("timestream.table"));
    }
}
