//! Logging infrastructure for WAV Channel Combiner.
//!
//! This module provides:
//! - Application-wide `tracing` setup (stderr, optional rolling file)
//! - Per-job log files
//! - Compact mode with progress filtering
//! - Tail buffer for error diagnosis
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use wcc_core::logging::{JobLogger, LogConfig};
//!
//! let logger = JobLogger::new("combine_1", "/path/to/logs", LogConfig::default()).unwrap();
//!
//! logger.section("Combine");
//! logger.command(Path::new("ffmpeg"), ["-i", "a.wav"]);
//! logger.progress(50);
//! logger.success("Created 2-channel file");
//! ```

mod job_logger;
mod types;

use std::path::Path;

pub use job_logger::{combine_job_name, JobLogger};
pub use types::{LogConfig, LogLevel, MessagePrefix};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name prefix of the rolling application log file.
const APP_LOG_PREFIX: &str = "wav-channel-combiner.log";

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()))
}

/// Initialize global tracing subscriber for application-wide logging.
///
/// Respects `RUST_LOG`, falling back to `default_level`, and writes to
/// stderr. Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(env_filter(default_level))
        .init();
}

/// Like [`init_tracing`], plus a daily-rolling log file in `logs_dir`.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the lifetime of the program.
pub fn init_tracing_with_file(default_level: LogLevel, logs_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(logs_dir, APP_LOG_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(file_writer),
        )
        .with(env_filter(default_level))
        .init();

    guard
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
