//! Logging setup.
//!
//! Writes to the console and to a daily-rotated file under `logs/`.
//! Console output respects the RUST_LOG environment variable and
//! defaults to `info`; the file layer always records `debug`.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "kensa-sheet.log";

/// Initialize the global tracing subscriber.
///
/// Failures are returned so the caller can keep running without file logs.
pub fn init() -> Result<()> {
    std::fs::create_dir_all(LOG_DIR)
        .with_context(|| format!("failed to create log directory {LOG_DIR}"))?;

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer().with_target(true).with_filter(console_filter);

    let file_appender = tracing_appender::rolling::daily(LOG_DIR, LOG_FILE_PREFIX);
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
