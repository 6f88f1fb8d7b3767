//! Structured logging system for mintscout
//!
//! This module provides a small, ergonomic logging API with:
//! - Automatic debug mode filtering from command-line arguments
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Colored console output plus an optional log file
//!
//! ## Usage
//!
//! ```rust
//! use mintscout::logger::{self, LogTag};
//!
//! logger::info(LogTag::Scanner, "Scanned 50 blocks");
//! logger::debug(LogTag::Rpc, "eth_call 0x...: ok"); // Only if --debug-rpc
//! ```
//!
//! Call `logger::init()` once at startup, before any logging occurs.

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{
    config_from_args, get_logger_config, init_from_args, set_logger_config,
    update_logger_config, LoggerConfig,
};
pub use file::init_file_logging;
pub use format::wrap_text;
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// 1. Parse command-line arguments for debug flags
/// 2. Configure per-module debug modes
/// 3. Open the log file when `--log-file <path>` is given
pub fn init() {
    config::init_from_args();

    if let Some(path) = crate::arguments::get_arg_value("--log-file") {
        if let Err(e) = file::init_file_logging(&path) {
            eprintln!("⚠️  {}", e);
        }
    }
}

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (important issues)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level, only shown with the matching --debug-<module> flag
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level, only shown with --verbose
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush pending log file writes
pub fn flush() {
    file::flush_file_logging();
}
