//! Logging setup for the two run modes.
//!
//! `serve` logs to stderr. `watch` owns the terminal, so its logs go to a
//! file instead. Both honour `RUST_LOG` and default to `info`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Default log file for the dashboard.
pub const TUI_LOG_FILE: &str = "citrate-watch.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize stderr logging for the server and one-shot commands.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_server_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter()),
        )
        .try_init();
}

/// Initialize file logging for the dashboard.
///
/// The returned guard flushes the background writer when dropped, so the
/// caller keeps it alive until the terminal is restored. Returns `None` when
/// the log file cannot be created; the dashboard then runs without logging.
pub fn init_tui_logging(path: &Path) -> Option<WorkerGuard> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(TUI_LOG_FILE);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .ok()?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false)
                .with_filter(env_filter()),
        )
        .try_init();

    Some(guard)
}
