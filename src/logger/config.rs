/// Logger configuration and command-line driven filtering
use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::get_cmd_args;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Most detailed level that is still printed
    pub min_level: LogLevel,
    /// Tags with debug output enabled (`--debug-<tag>`)
    pub debug_tags: HashSet<String>,
    /// Tags with verbose output enabled (`--verbose-<tag>`)
    pub verbose_tags: HashSet<String>,
    /// When non-empty, only these tags print below ERROR
    pub enabled_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

pub fn update_logger_config<F: FnOnce(&mut LoggerConfig)>(f: F) {
    f(&mut LOGGER_CONFIG.write());
}

/// Build the logger configuration from the process arguments
pub fn init_from_args() {
    set_logger_config(config_from_args(&get_cmd_args()));
}

/// Derive a logger configuration from an argument list
pub fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    if has_quiet(args) {
        config.min_level = LogLevel::Error;
    }

    if args.iter().any(|a| a == "--verbose") {
        config.min_level = LogLevel::Verbose;
    }

    let debug_all = args.iter().any(|a| a == "--debug-all");

    for tag in LogTag::ALL.iter() {
        let key = tag.to_debug_key();
        if debug_all || args.iter().any(|a| *a == format!("--debug-{}", key)) {
            config.debug_tags.insert(key.clone());
        }
        if args.iter().any(|a| *a == format!("--verbose-{}", key)) {
            config.verbose_tags.insert(key);
        }
    }

    // Debug and verbose lines must also pass the level threshold
    if !has_quiet(args) {
        if !config.verbose_tags.is_empty() {
            config.min_level = config.min_level.max(LogLevel::Verbose);
        } else if !config.debug_tags.is_empty() {
            config.min_level = config.min_level.max(LogLevel::Debug);
        }
    }

    config
}

fn has_quiet(args: &[String]) -> bool {
    args.iter().any(|a| a == "--quiet")
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    LOGGER_CONFIG.read().debug_tags.contains(&tag.to_debug_key())
}

pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    LOGGER_CONFIG.read().verbose_tags.contains(&tag.to_debug_key())
}
