//! Structured Logger
//!
//! Wraps `tracing` with environment-based level control, a console layer
//! and, when a directory is configured, a daily rolling file.

use std::path::Path;

use anyhow::{Context, Result};
use slashforge_config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "slashforge.log";

/// Keeps the file writer flushing; drop it at shutdown.
#[must_use]
pub struct LogGuard(Option<WorkerGuard>);

/// Initialize the global logger from config.
///
/// `RUST_LOG` overrides the configured level. The console writes to stderr so
/// stdout stays free for command output. Calling this twice is harmless; the
/// first subscriber stays installed.
pub fn init_logger(config: &LoggingConfig) -> Result<LogGuard> {
    let level = config.level.as_deref().unwrap_or("info");
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level directive '{level}'"))?;
    let json = config.json.unwrap_or(false);

    let console_layer = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
            .boxed()
    };

    // Rolling file appender: NDJSON to `<dir>/slashforge.log.YYYY-MM-DD`
    let (file_layer, guard) = match config.dir.as_deref() {
        Some(dir) => {
            let (layer, guard) = file_layer(Path::new(dir))?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    Ok(LogGuard(guard))
}

fn file_layer<S>(dir: &Path) -> Result<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer().json().with_writer(writer).with_ansi(false).boxed();
    Ok((layer, guard))
}
