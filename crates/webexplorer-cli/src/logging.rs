//! Tracing subscriber setup
//!
//! Console output goes to stderr: stdout carries the MCP protocol.

use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};
use webexplorer::{LogFormat, Settings};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber. Returns an error message if the log file
/// cannot be opened or a subscriber is already set.
pub fn init(settings: &Settings) -> Result<(), String> {
    let console_level = if settings.debug {
        "debug"
    } else {
        settings.logging.console_log_level.as_str()
    };

    let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter(console_level))
        .boxed()];

    if let Some(path) = &settings.logging.log_file_path {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| format!("cannot open log file {}: {}", path.display(), e))?;
        let file = Arc::new(file);
        let filter = level_filter(&settings.logging.file_log_level);

        let layer = match settings.logging.log_file_format {
            LogFormat::Text => fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(file)
                .with_filter(filter)
                .boxed(),
        };
        layers.push(layer);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| e.to_string())
}

/// `RUST_LOG` wins over the configured console level
fn console_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(level))
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}
