use super::schemas::Config;
/// Configuration utilities - loading and access helpers
///
/// This module provides utility functions for working with the configuration system:
/// - Loading configuration from disk (TOML)
/// - Thread-safe access helpers
use once_cell::sync::OnceCell;
use std::sync::RwLock;

/// Global configuration instance
///
/// Only the binary reads it; library components receive their config
/// sections explicitly at construction.
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Load configuration from a specific file path
///
/// # Returns
/// - `Ok(())` - Configuration loaded and validated
/// - `Err(String)` - Error message if reading, parsing or validation failed
pub fn load_config_from_path(path: &str) -> Result<(), String> {
    let config = if std::path::Path::new(path).exists() {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;

        parse_config(&contents).map_err(|e| format!("Config file '{}': {}", path, e))?
    } else {
        eprintln!("⚠️  Config file '{}' not found, using default values", path);
        Config::default()
    };

    config.validate()?;

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(())
}

/// Parse a TOML document into a Config (missing sections keep defaults)
pub fn parse_config(contents: &str) -> Result<Config, String> {
    toml::from_str::<Config>(contents).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Execute a function with read access to the configuration
///
/// Falls back to defaults when `load_config_from_path()` has not run yet.
///
/// # Example
/// ```
/// use mintscout::config::with_config;
///
/// let block_range = with_config(|cfg| cfg.scanner.block_range);
/// assert!(block_range > 0);
/// ```
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get() {
        Some(lock) => {
            let config = lock.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            f(&config)
        }
        None => f(&Config::default()),
    }
}

/// Get a clone of the entire configuration
///
/// Useful when the values have to live across await points.
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}
