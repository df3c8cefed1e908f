//! Loading `strobe.toml` from disk or from a string.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::RunConfig;

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    load_config_from_str(&text)
}

/// Parses and validates configuration text.
pub fn load_config_from_str(text: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig =
        toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
