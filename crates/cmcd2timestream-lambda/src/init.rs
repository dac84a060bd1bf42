use cmcd2timestream_config::{LogFormat, Platform, RuntimeConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub(crate) fn init_tracing(config: &RuntimeConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // CloudWatch adds its own timestamps
    let _ = match config.log_format(Platform::Lambda) {
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().without_time().with_current_span(true)),
        ),
        LogFormat::Text => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().without_time().with_ansi(false)),
        ),
    };
}
