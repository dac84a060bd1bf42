use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cmcd2timestream::{InputFormat, ReplayOptions};
use cmcd2timestream_config::RuntimeConfig;
use cmcd2timestream_core::SchemaVersion;
use std::path::PathBuf;

/// Ingest CloudFront real-time logs carrying CMCD telemetry into Amazon Timestream
#[derive(Parser)]
#[command(name = "cmcd2timestream")]
#[command(version)]
#[command(about = "Ingest CloudFront real-time logs carrying CMCD telemetry into Amazon Timestream", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a captured log file through the pipeline
    Replay {
        /// Input file, one record per line
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Lines are base64 stream payloads rather than raw log lines
        #[arg(long)]
        base64: bool,

        /// Print encoded records as JSON lines instead of writing to Timestream
        #[arg(long)]
        dry_run: bool,

        /// Field schema version (overrides config file)
        #[arg(long, value_name = "VERSION")]
        schema: Option<SchemaVersion>,

        /// Records per write call, 1-100 (overrides config file)
        #[arg(long, value_name = "N")]
        batch_size: Option<usize>,
    },
    /// Print a field schema
    Schema {
        /// Schema version to print (defaults to the configured one)
        #[arg(long = "version", value_name = "VERSION")]
        schema_version: Option<SchemaVersion>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli)?;
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }

    match cli.command {
        Commands::Schema { schema_version } => {
            print!(
                "{}",
                cmcd2timestream::render_schema(schema_version.unwrap_or(config.schema.version))
            );
            Ok(())
        }
        Commands::Replay {
            input,
            base64,
            dry_run,
            schema,
            batch_size,
        } => {
            if let Some(schema) = schema {
                config.schema.version = schema;
            }
            if let Some(batch_size) = batch_size {
                config.batch.max_records = batch_size;
            }
            config.validate()?;

            let replay = ReplayOptions {
                input,
                format: if base64 {
                    InputFormat::Base64
                } else {
                    InputFormat::Lines
                },
                dry_run,
            };

            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to build tokio runtime")?
                .block_on(run_replay(config, replay))
        }
    }
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    match &cli.config {
        Some(path) => RuntimeConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => RuntimeConfig::load().context("Failed to load configuration"),
    }
}

async fn run_replay(config: RuntimeConfig, replay: ReplayOptions) -> Result<()> {
    cmcd2timestream::init_tracing(&config);

    tracing::info!(
        input = %replay.input.display(),
        schema = %config.schema.version,
        batch_size = config.batch.max_records,
        dry_run = replay.dry_run,
        "Starting replay"
    );

    let result = cmcd2timestream::run_replay(&config, &replay).await?;
    let summary = serde_json::to_string_pretty(&result).context("Failed to render summary")?;
    eprintln!("{}", summary);
    Ok(())
}
