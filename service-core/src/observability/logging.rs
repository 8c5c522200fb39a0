use std::str::FromStr;

use tracing::Subscriber;
use tracing_subscriber::{
    Layer, fmt::MakeWriter, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Map a `LOG_LEVEL` value onto a tracing level directive.
///
/// Accepts tracing's own levels plus the npm-style names operators tend to
/// carry over from other services (`http`, `verbose`, `silly`).
pub fn level_directive(level: &str) -> Option<&'static str> {
    match level.trim().to_lowercase().as_str() {
        "error" => Some("error"),
        "warn" | "warning" => Some("warn"),
        "info" => Some("info"),
        "http" | "verbose" | "debug" => Some("debug"),
        "silly" | "trace" => Some("trace"),
        _ => None,
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `log_level` when set.
/// Call once, before the server starts.
pub fn init_tracing(service_name: &str, log_level: &str, format: LogFormat) {
    let directive = level_directive(log_level).unwrap_or("info");
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry.with(json_layer(std::io::stdout)).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::debug!(service = %service_name, level = %directive, "Logging initialized");
}

/// One JSON object per line: event fields at the top level, the enclosing
/// request span under `span`.
fn json_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_current_span(true)
        .flatten_event(true)
}
