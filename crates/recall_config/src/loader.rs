//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::RecallConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE: &str = "recall.toml";

/// Loads and validates a `recall.toml` configuration from a project directory.
///
/// Reads `<project_dir>/recall.toml`, parses it, and validates its values.
pub fn load_config(project_dir: &Path) -> Result<RecallConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<RecallConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_config_from_str(&content)
}

/// Loads `<project_dir>/recall.toml` if it exists, otherwise returns defaults.
pub fn discover_config(project_dir: &Path) -> Result<RecallConfig, ConfigError> {
    let path = project_dir.join(CONFIG_FILE);
    if path.is_file() {
        load_config_file(&path)
    } else {
        Ok(RecallConfig::default())
    }
}

/// Parses and validates a `recall.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<RecallConfig, ConfigError> {
    let config: RecallConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values can be used to build cache paths.
fn validate_config(config: &RecallConfig) -> Result<(), ConfigError> {
    if config.cache.root.as_os_str().is_empty() {
        return Err(ConfigError::Empty("cache.root"));
    }

    let ext = &config.cache.extension;
    if ext.is_empty() {
        return Err(ConfigError::Empty("cache.extension"));
    }
    if ext.contains(['.', '/', '\\']) {
        return Err(ConfigError::Invalid {
            key: "cache.extension",
            reason: format!("'{ext}' must not contain dots or path separators"),
        });
    }

    if config.progress.preview_chars == 0 {
        return Err(ConfigError::Invalid {
            key: "progress.preview_chars",
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}
