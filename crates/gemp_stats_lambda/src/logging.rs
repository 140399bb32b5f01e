use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON object per event, for CloudWatch.
    #[default]
    Json,
    Pretty,
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing(level: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = Registry::default().with(env_filter);

    let result = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_target(false)
                    .with_ansi(false),
            )
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).try_init(),
    };

    if let Err(error) = result {
        let message = error.to_string();
        if !message.contains("already been set") {
            eprintln!("failed to initialize tracing: {error}");
        }
    }
}
