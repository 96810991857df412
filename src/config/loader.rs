//! Configuration loader.
//!
//! Handles loading configuration from multiple sources with proper
//! precedence.

use std::path::PathBuf;

use config::{Config, Environment as EnvSource, File};

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for the configuration directory
const CONFIG_DIR_ENV: &str = "SHAREIT_CONFIG_DIR";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "SHAREIT";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader that handles layered configuration loading.
///
/// Sources, in order of priority (lowest to highest):
/// 1. `default.toml` - base configuration
/// 2. `{environment}.toml` - environment-specific configuration (optional)
/// 3. `local.toml` - local overrides, not committed (optional)
/// 4. `SHAREIT_*` environment variables (e.g. `SHAREIT_DATABASE__URL`)
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: Environment,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    ///
    /// Reads `SHAREIT_CONFIG_DIR` for the configuration directory and
    /// `SHAREIT_APP_ENV` for the environment, with sensible defaults.
    pub fn new() -> Self {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));
        Self {
            config_dir,
            environment: Environment::from_env(),
        }
    }

    /// Create a loader rooted at an explicit configuration directory.
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            environment: Environment::from_env(),
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Load settings from all sources.
    ///
    /// Missing files are tolerated; a missing directory simply means the
    /// defaults plus environment variables apply.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let default_file = self.config_dir.join("default.toml");
        let env_file = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let local_file = self.config_dir.join("local.toml");

        let config = Config::builder()
            .add_source(File::from(default_file).required(false))
            .add_source(File::from(env_file).required(false))
            .add_source(File::from(local_file).required(false))
            .add_source(
                EnvSource::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_yields_defaults() {
        let loader = ConfigLoader::with_config_dir(PathBuf::from("/nonexistent-config-dir"));
        let settings = loader.load().unwrap();
        assert_eq!(settings.server.port, 8080);
    }
}
