//! Logging Infrastructure
//!
//! Structured logging setup for development (pretty console) and production
//! (JSON). `RUST_LOG` overrides the configured level.

use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Initialize the logger with defaults
pub fn init_logger() -> anyhow::Result<()> {
    init_logger_with_file(None, None, None)
}

/// Initialize the logger with optional JSON formatting and daily file output
pub fn init_logger_with_file(
    log_level: Option<&str>,
    json: Option<bool>,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("review_service={level},tower_http={level},{level}")))?;

    let writer = match log_dir {
        Some(dir) => {
            let log_path = Path::new(dir);
            std::fs::create_dir_all(log_path)?;
            BoxMakeWriter::new(tracing_appender::rolling::daily(log_path, "review-service"))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .with_thread_ids(false);

    let result = if json.unwrap_or(false) {
        builder.json().try_init()
    } else {
        builder.with_ansi(log_dir.is_none()).try_init()
    };
    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
