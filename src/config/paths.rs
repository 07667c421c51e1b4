//! Platform-aware configuration paths for parqsql

use crate::error::ConfigError;
use std::env;
use std::path::PathBuf;

/// Name of the configuration file inside [`config_dir`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the configuration directory for the current platform
///
/// `PARQSQL_CONFIG_DIR` overrides the platform default.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(custom_dir) = env::var("PARQSQL_CONFIG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }

    dirs::config_dir()
        .map(|p| p.join("parqsql"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Default location of the session configuration file
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}
