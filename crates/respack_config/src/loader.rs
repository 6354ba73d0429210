//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::CompileConfig;
use std::path::Path;

/// Name of the configuration file within the package directory.
pub const CONFIG_FILE: &str = "compile.config";

/// Loads and validates `compile.config` from a package directory.
///
/// A missing file is not an error: the default configuration is returned.
/// An unreadable or malformed file is.
pub fn load_config(package_dir: &Path) -> Result<CompileConfig, ConfigError> {
    let config_path = package_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(CompileConfig::default());
    }
    let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::IoError {
        path: config_path.clone(),
        source: e,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `compile.config` document from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<CompileConfig, ConfigError> {
    let config: CompileConfig =
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that directories are named and do not overlap.
fn validate_config(config: &CompileConfig) -> Result<(), ConfigError> {
    if config.output.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "output directory must not be empty".to_string(),
        ));
    }
    if config.intermediate.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "intermediate directory must not be empty".to_string(),
        ));
    }
    // The output directory is wiped before every build.
    let output = Path::new(&config.output);
    let intermediate = Path::new(&config.intermediate);
    if output == intermediate {
        return Err(ConfigError::ValidationError(format!(
            "output and intermediate directories must differ (both are '{}')",
            config.output
        )));
    }
    if intermediate.starts_with(output) {
        return Err(ConfigError::ValidationError(format!(
            "intermediate directory '{}' must not be inside output directory '{}'",
            config.intermediate, config.output
        )));
    }
    Ok(())
}
