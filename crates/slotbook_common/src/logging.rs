//! Logging setup for Slotbook.
//!
//! Every binary calls one of the `init*` functions once at startup. Events
//! always go to stdout; when a log directory is configured they are also
//! written to a daily-rotated file through a non-blocking writer.

use slotbook_config::LoggingConfig;
use std::str::FromStr;
use tracing::{info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix for rotated log files.
pub const LOG_FILE_PREFIX: &str = "slotbook.log";

/// Initialize the tracing subscriber at INFO level, stdout only.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level, stdout only.
pub fn init_with_level(level: Level) {
    // The guard is only needed for the file writer, which is not installed here.
    let _ = install(level, None);
}

/// Initialize the tracing subscriber from the `[logging]` config section.
///
/// The returned guard flushes the file writer on drop, so keep it alive
/// for the lifetime of the process.
pub fn init_with_config(config: &LoggingConfig) -> Option<WorkerGuard> {
    let level = config
        .level
        .as_deref()
        .map(|raw| match Level::from_str(raw) {
            Ok(level) => level,
            Err(_) => {
                eprintln!("Unknown log level '{}', falling back to INFO", raw);
                Level::INFO
            }
        })
        .unwrap_or(Level::INFO);

    install(level, config.directory.as_deref())
}

fn install(level: Level, directory: Option<&str>) -> Option<WorkerGuard> {
    // RUST_LOG still wins for other targets; our crates get the configured level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let filter = match format!("slotbook={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };

    let (file_layer, guard) = match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(file_layer)
        .with(filter)
        .try_init();

    match result {
        Ok(()) => {
            info!("Logging initialized at level: {}", level);
            if let Some(dir) = directory {
                info!("Writing log files to {}", dir);
            }
        }
        // Another subscriber won the race (common in tests); keep using it.
        Err(err) => warn!("Logging already initialized: {}", err),
    }

    guard
}
