// Replay a captured real-time log file through the ingestion pipeline

use anyhow::{Context, Result};
use cmcd2timestream_config::RuntimeConfig;
use cmcd2timestream_handlers::{process_lines, process_payloads, PipelineOptions, ProcessingResult};
use cmcd2timestream_writer::{initialize_timestream_writer, JsonLinesWriter, RecordWriter};
use std::path::{Path, PathBuf};

/// How the input file is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// One tab-separated log line per line.
    #[default]
    Lines,
    /// One base64 payload per line, as delivered by the stream.
    Base64,
}

#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub input: PathBuf,
    pub format: InputFormat,
    /// Print encoded records as JSON lines instead of writing to Timestream.
    pub dry_run: bool,
}

/// Read non-blank lines from `path`.
pub fn read_input(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

/// Feed `lines` to `writer` using the configured schema and batch size.
pub async fn replay_lines<W: RecordWriter + ?Sized>(
    lines: &[String],
    format: InputFormat,
    options: PipelineOptions,
    writer: &W,
) -> ProcessingResult {
    tracing::debug!(
        lines = lines.len(),
        writer = writer.name(),
        schema = %options.schema,
        "Replaying input"
    );
    match format {
        InputFormat::Lines => process_lines(lines, options, writer).await,
        InputFormat::Base64 => process_payloads(lines, options, writer).await,
    }
}

/// Run a replay end to end with the writer the options select.
pub async fn run_replay(config: &RuntimeConfig, replay: &ReplayOptions) -> Result<ProcessingResult> {
    let options = PipelineOptions {
        schema: config.schema.version,
        batch: config.batch_config()?,
    };
    let lines = read_input(&replay.input)?;

    if replay.dry_run {
        let writer = JsonLinesWriter::new(std::io::stdout(), config.timestream.measure_name.clone());
        return Ok(replay_lines(&lines, replay.format, options, &writer).await);
    }

    let writer = initialize_timestream_writer(config)
        .await
        .context("Failed to initialize Timestream writer")?;
    Ok(replay_lines(&lines, replay.format, options, &writer).await)
}
