//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → user config dir → defaults.

use std::path::{Path, PathBuf};

use crate::trace::TraceConfig;
use crate::validate::{validate_config, ValidationError};

/// Where the configuration was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in the user's config directory.
    UserConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::UserConfig => write!(f, "user config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "RZW_CONFIG";
pub const ENV_CONFIG_DIR: &str = "RZW_CONFIG_DIR";

/// Standard config file name.
const CONFIG_FILENAME: &str = "config.json";

/// Application name for the user config directory.
const APP_NAME: &str = "reprozip-windows";

/// A validated configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TraceConfig,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve the configuration file path.
///
/// 1. Explicit CLI path (must exist)
/// 2. `RZW_CONFIG` environment variable
/// 3. `RZW_CONFIG_DIR` environment variable + `config.json`
/// 4. User config directory (`<config_dir>/reprozip-windows/config.json`)
/// 5. Built-in defaults (None)
pub fn resolve_config_path(
    cli_path: Option<&Path>,
) -> Result<(Option<PathBuf>, ConfigSource), ValidationError> {
    if let Some(path) = cli_path {
        // An explicit path that does not exist is a user mistake, not a
        // reason to silently fall back.
        if !path.exists() {
            return Err(ValidationError::IoError(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return Ok((Some(path.to_path_buf()), ConfigSource::CliArgument));
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok((Some(path), ConfigSource::Environment));
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return Ok((Some(path), ConfigSource::Environment));
        }
    }

    if let Some(dir) = user_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return Ok((Some(path), ConfigSource::UserConfig));
        }
    }

    Ok((None, ConfigSource::BuiltinDefault))
}

/// Resolve, parse and validate the configuration.
pub fn load_config(cli_path: Option<&Path>) -> Result<LoadedConfig, ValidationError> {
    let (path, source) = resolve_config_path(cli_path)?;
    let config = match &path {
        Some(path) => TraceConfig::from_file(path)?,
        None => TraceConfig::default(),
    };
    validate_config(&config)?;
    Ok(LoadedConfig {
        config,
        path,
        source,
    })
}

/// Get the user config directory for this tool.
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
