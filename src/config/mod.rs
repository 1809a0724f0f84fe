//! Configuration system
//!
//! Schemas are declared with `config_struct!`, loaded from TOML, then
//! overridden by environment variables and command-line flags.

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::*;
pub use utils::{
    apply_cli_overrides, apply_env_overrides, load_config, read_config_file, ConfigError,
    CONFIG_FILE_PATH,
};
