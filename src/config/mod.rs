/// Configuration system
///
/// - `macros`: the `config_struct!` definition macro
/// - `schemas`: every config section with its defaults
/// - `utils`: loading from TOML and global access
pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::*;
pub use utils::{
    get_config_clone, load_config_from_path, parse_config, with_config,
    CONFIG_FILE_PATH,
};
