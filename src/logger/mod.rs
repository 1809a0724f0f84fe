//! Structured, tagged logging for aquasonda
//!
//! - Standard levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug output via `--debug <module>`
//! - Dual output: colored console + daily log file
//!
//! ## Usage
//!
//! ```rust
//! use aquasonda::logger::{self, LogTag};
//!
//! logger::info(LogTag::Ingest, "Reading stored");
//! logger::warning(LogTag::Database, "Pool exhausted, retrying");
//! logger::debug(LogTag::Broadcast, "Matched 3 subscriptions"); // only with --debug broadcast
//! ```
//!
//! Call [`init`] once at startup. Before that, console output at Info and
//! above works and file output is disabled.

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{
    get_logger_config, init_from_args, set_logger_config, update_logger_config, LoggerConfig,
};
pub use levels::LogLevel;
pub use tags::LogTag;

use crate::arguments::Arguments;
use std::path::PathBuf;

/// Initialize the logger from the parsed command line.
///
/// `log_dir` enables the daily log file when set.
pub fn init(args: &Arguments, log_dir: Option<PathBuf>) {
    config::init_from_args(args, log_dir.clone());

    if let Some(dir) = log_dir {
        file::init_file_logging(&dir);
    }
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level, shown only with `--debug <module>` for the tag
///
/// ```ignore
/// // Only shown with --debug ingest
/// logger::debug(LogTag::Ingest, "Context resolved for sensor 7");
/// ```
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level, shown only with `--verbose`
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Flush pending log file writes. Call during shutdown.
pub fn flush() {
    file::flush_file_logging();
}
