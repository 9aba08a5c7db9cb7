//! Tracing subscriber setup.
//!
//! The terminal UI owns stdout, so it logs to a file under the Veritas home.
//! One-shot commands log to stderr.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log file name inside the logs directory.
pub const LOG_FILE: &str = "veritas.log";

/// Guard that flushes the non-blocking log writer when dropped.
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(level: &str, debug: bool) -> String {
    if debug {
        "trace".to_string()
    } else {
        level.to_string()
    }
}

fn build_filter(level: &str, debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level, debug)))
}

/// Write logs to `<log_dir>/veritas.log`. Keep the guard for the process lifetime.
pub fn init_file_logging(log_dir: &Path, level: &str, debug: bool) -> Result<LogGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(build_filter(level, debug))
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogGuard { _guard: guard })
}

/// Compact stderr logging for one-shot commands.
pub fn init_stderr_logging(level: &str, debug: bool) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(level, debug))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
