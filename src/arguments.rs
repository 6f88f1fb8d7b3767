/// Centralized argument handling for mintscout
///
/// Features:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Value lookup for `--flag value` pairs
/// - Help text and debug flag reporting
use crate::logger::LogTag;
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
pub fn get_arg_value(flag: &str) -> Option<String> {
    arg_value_in(&get_cmd_args(), flag)
}

fn arg_value_in(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .filter(|value| !value.starts_with("--"))
        .cloned()
}

// =============================================================================
// COMMAND OPTIONS
// =============================================================================

/// Options understood by the `mintscout` binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub block_range: Option<u64>,
    pub wallet: Option<String>,
    pub config_path: Option<String>,
    pub json: bool,
}

impl CliOptions {
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let block_range = match arg_value_in(args, "--blocks") {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| format!("--blocks expects a positive integer, got '{}'", raw))?,
            ),
            None => None,
        };

        Ok(Self {
            block_range,
            wallet: arg_value_in(args, "--wallet"),
            config_path: arg_value_in(args, "--config"),
            json: args.iter().any(|a| a == "--json"),
        })
    }

    /// Parse the process arguments
    pub fn parse() -> Result<Self, String> {
        Self::from_args(&get_cmd_args())
    }
}

pub mod patterns {
    use super::has_arg;

    pub fn is_help_requested() -> bool {
        has_arg("--help") || has_arg("-h")
    }
}

/// Print usage information
pub fn print_help() {
    println!("mintscout - find freshly minted ERC-721 collections\n");
    println!("USAGE:");
    println!("    mintscout [OPTIONS]\n");
    println!("OPTIONS:");
    println!("    --blocks <n>        Blocks to look back (window is capped at the RPC log range)");
    println!("    --wallet <0x...>    Show which discovered collections this wallet holds");
    println!("    --config <path>     Config file (default: data/config.toml)");
    println!("    --json              Print JSON instead of a table");
    println!("    --log-file <path>   Mirror log lines to a file");
    println!("    --quiet             Only print errors");
    println!("    --verbose           Print everything");
    println!("    --debug-all         Enable debug output for every module");
    println!("    -h, --help          Show this help\n");
    println!("DEBUG FLAGS:");
    for tag in LogTag::ALL.iter() {
        println!("    --debug-{}", tag.to_debug_key());
    }
}

/// Log which debug modes are active
pub fn print_debug_info() {
    let enabled: Vec<String> = LogTag::ALL
        .iter()
        .map(|tag| format!("--debug-{}", tag.to_debug_key()))
        .filter(|flag| has_arg(flag))
        .collect();

    if !enabled.is_empty() || has_arg("--debug-all") {
        crate::logger::info(
            LogTag::System,
            &format!(
                "Debug modes enabled: {}",
                if has_arg("--debug-all") {
                    "all".to_string()
                } else {
                    enabled.join(", ")
                }
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cli_options_defaults() {
        let options = CliOptions::from_args(&args(&["mintscout"])).unwrap();
        assert_eq!(options.block_range, None);
        assert_eq!(options.wallet, None);
        assert!(!options.json);
    }

    #[test]
    fn test_cli_options_values() {
        let options = CliOptions::from_args(&args(&[
            "mintscout",
            "--blocks",
            "120",
            "--wallet",
            "0x00000000000000000000000000000000000000aa",
            "--json",
        ]))
        .unwrap();

        assert_eq!(options.block_range, Some(120));
        assert_eq!(
            options.wallet.as_deref(),
            Some("0x00000000000000000000000000000000000000aa")
        );
        assert!(options.json);
    }

    #[test]
    fn test_invalid_block_count() {
        let err = CliOptions::from_args(&args(&["mintscout", "--blocks", "many"])).unwrap_err();
        assert!(err.contains("--blocks"));
    }

    #[test]
    fn test_flag_without_value() {
        let options = CliOptions::from_args(&args(&["mintscout", "--config", "--json"])).unwrap();
        assert_eq!(options.config_path, None);
        assert!(options.json);
    }
}
