//! Logging setup with file output and size-based rotation.
//!
//! Writes logs to `~/.config/guidance/guidance.log` (or platform equivalent)
//! with 10 MB rotation. Console output goes to stderr so stdout carries only
//! the spoken utterances. Set `DEBUG_LOGGING=1` for debug output from the
//! guidance crates.

use std::path::PathBuf;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging {
        "info,guidance_core=debug,guidance_cli=debug"
    } else {
        "warn,guidance_cli=info"
    }
}

/// Initialize logging to a rotated file and stderr.
///
/// The returned guard must be held until exit so buffered lines are flushed.
/// Falls back to stderr only when the log file cannot be created.
pub fn init() -> Option<WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let (file_writer, log_path) = match open_log_file() {
        Ok((appender, path)) => (Some(tracing_appender::non_blocking(appender)), Some(path)),
        Err(reason) => {
            eprintln!("{reason}, logging to stderr only");
            (None, None)
        }
    };
    let (file_layer, guard) = match file_writer {
        Some((writer, guard)) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_span_events(FmtSpan::NONE);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive(debug_logging)))
        .init();

    tracing::debug!(log_file = ?log_path, debug_logging, "Logging initialized");

    guard
}

fn open_log_file() -> Result<(BasicRollingFileAppender, PathBuf), String> {
    let log_dir = dirs::config_dir()
        .map(|config| config.join("guidance"))
        .ok_or_else(|| "No config directory".to_string())?;
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| format!("Failed to create log directory {log_dir:?}: {e}"))?;

    let log_path = log_dir.join("guidance.log");
    let appender = BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(MAX_LOG_BYTES),
        1,
    )
    .map_err(|e| format!("Failed to create log file at {log_path:?}: {e}"))?;
    Ok((appender, log_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_directives_parse() {
        for debug_logging in [false, true] {
            assert!(EnvFilter::try_new(filter_directive(debug_logging)).is_ok());
        }
    }
}
