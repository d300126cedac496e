//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::SliceDepConfig;
use std::path::Path;

/// Name of the configuration file within a project directory.
pub const CONFIG_FILE: &str = "slicedep.toml";

/// Loads and validates a `slicedep.toml` configuration from a project directory.
///
/// Reads `<project_dir>/slicedep.toml`, parses it, validates it, and rebases
/// relative paths onto `project_dir`. A missing file yields the default
/// configuration.
pub fn load_config(project_dir: &Path) -> Result<SliceDepConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(SliceDepConfig::default());
    }
    let content = std::fs::read_to_string(&config_path)?;
    let mut config = load_config_from_str(&content)?;
    config.tracker = config.tracker.rebase(project_dir);
    Ok(config)
}

/// Parses and validates a `slicedep.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<SliceDepConfig, ConfigError> {
    let config: SliceDepConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configured paths are usable.
fn validate_config(config: &SliceDepConfig) -> Result<(), ConfigError> {
    let tracker = &config.tracker;
    if tracker
        .output_dir
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "tracker.output_dir is empty".to_string(),
        ));
    }
    if let Some(file) = &tracker.dependency_file {
        if file.file_name().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "tracker.dependency_file '{}' does not name a file",
                file.display()
            )));
        }
    }
    Ok(())
}
