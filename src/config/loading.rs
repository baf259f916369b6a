//! Configuration loading functions.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::error::{ConfigError, ConfigFormat};
use super::types::Config;

const PROJECT_CONFIG_FILES: [&str; 4] = [
    ".posture-audit.yaml",
    ".posture-audit.yml",
    ".posture-audit.json",
    ".posture-audit.toml",
];

impl Config {
    /// Load configuration from a file. The extension picks the syntax.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ConfigFormat::from_extension)
            .ok_or_else(|| ConfigError::UnknownFormat {
                path: path.to_path_buf(),
            })?;

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(&content)
                .map_err(|e| ConfigError::syntax(path, format, e)),
            ConfigFormat::Json => serde_json::from_str(&content)
                .map_err(|e| ConfigError::syntax(path, format, e)),
            ConfigFormat::Toml => {
                toml::from_str(&content).map_err(|e| ConfigError::syntax(path, format, e))
            }
        }
    }

    /// Load configuration from the working directory or the user config.
    ///
    /// Search order:
    /// 1. `.posture-audit.{yaml,yml,json,toml}` in `dir`
    /// 2. `<config_dir>/posture-audit/config.yaml`
    /// 3. Default configuration
    ///
    /// A file that exists but cannot be parsed is skipped with a warning.
    pub fn load(dir: Option<&Path>) -> Self {
        if let Some(dir) = dir {
            for filename in PROJECT_CONFIG_FILES {
                let path = dir.join(filename);
                if path.exists()
                    && let Some(config) = Self::try_file(&path)
                {
                    return config;
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let global_config = config_dir.join("posture-audit").join("config.yaml");
            if global_config.exists()
                && let Some(config) = Self::try_file(&global_config)
            {
                return config;
            }
        }

        Self::default()
    }

    fn try_file(path: &Path) -> Option<Self> {
        match Self::from_file(path) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded configuration");
                Some(config)
            }
            Err(e) => {
                warn!(error = %e, "Skipping configuration file");
                None
            }
        }
    }
}
