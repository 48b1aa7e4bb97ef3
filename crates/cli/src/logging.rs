//! Tracing setup.
//!
//! Headless commands log to stderr so stdout carries only the agent log.
//! The TUI owns the terminal, so it logs to a file instead.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Name of the TUI log file inside the log directory.
pub const LOG_FILE_NAME: &str = "price-scout.log";

/// Level used when `RUST_LOG` is unset.
fn level(verbose: u8, quiet_default: &'static str) -> &'static str {
    match verbose {
        0 => quiet_default,
        1 => "debug",
        _ => "trace",
    }
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Log warnings and errors to stderr.
pub fn init_stderr(verbose: u8) {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter(level(verbose, "warn"))),
        )
        .try_init();
}

/// Log to `{log_dir}/price-scout.log`, one file per day.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_file(log_dir: &Path, verbose: u8) -> color_eyre::Result<WorkerGuard> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(filter(level(verbose, "info"))),
        )
        .try_init();

    tracing::info!(dir = %log_dir.display(), "logging initialised");
    Ok(guard)
}
