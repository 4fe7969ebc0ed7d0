//! Operational log: `tracing` to stderr, plus an optional append-only
//! JSON file.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log file name inside the log directory.
pub const LOG_FILE: &str = "tripwise.log";

/// Keeps the file writer alive; drop it last.
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// Install the global subscriber. `RUST_LOG` overrides `level`.
pub fn init(level: &str, log_dir: Option<&Path>) -> Result<LogGuard> {
    let level = parse_level(level)?;
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(filter());

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log dir {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(LogGuard { _guard: guard })
}

pub fn parse_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "invalid log level: {level} (expected trace, debug, info, warn or error)"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_known_levels() {
        for (input, expected) in [
            ("trace", Level::TRACE),
            ("debug", Level::DEBUG),
            ("info", Level::INFO),
            ("WARN", Level::WARN),
            ("error", Level::ERROR),
        ] {
            assert_eq!(parse_level(input).unwrap(), expected);
        }
    }

    #[test]
    fn parse_level_rejects_garbage() {
        let err = parse_level("loud").unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }
}
