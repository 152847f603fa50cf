//! Configuration file discovery, loading, and validation.

use crate::error::ConfigError;
use crate::skip::SkipList;
use crate::types::QuellConfig;
use std::path::{Path, PathBuf};

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "quell.toml";

/// Walks up from `start` looking for a `quell.toml`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Loads and validates the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<QuellConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `quell.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<QuellConfig, ConfigError> {
    let config: QuellConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are consistent.
fn validate_config(config: &QuellConfig) -> Result<(), ConfigError> {
    if config.suppress.writable && config.suppress.file.is_none() {
        return Err(ConfigError::ValidationError(
            "suppress.writable requires suppress.file".to_string(),
        ));
    }
    SkipList::parse(&config.skip.patterns)?;
    Ok(())
}
