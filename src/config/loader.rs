//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::DappConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the config file for the deployment runner.
pub const CONFIG_PATH_ENV_VAR: &str = "WHITELIST_CONFIG";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<DappConfig, ConfigError> {
    let config: DappConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DappConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Load from an optional path, falling back to validated defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<DappConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = DappConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

/// Load the file named by `WHITELIST_CONFIG`, or defaults when unset.
pub fn load_from_env() -> Result<DappConfig, ConfigError> {
    match std::env::var_os(CONFIG_PATH_ENV_VAR) {
        Some(path) => load_config(Path::new(&path)),
        None => load_or_default(None),
    }
}
