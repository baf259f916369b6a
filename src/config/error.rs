//! Configuration errors.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Syntax a configuration file is written in, chosen by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// `yaml`/`yml`, `json` or `toml`, case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        })
    }
}

/// A configuration file that exists but cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {format} in config {}: {source}", path.display())]
    Syntax {
        path: PathBuf,
        format: ConfigFormat,
        #[source]
        source: BoxedSource,
    },

    #[error("config {} is neither YAML, JSON nor TOML", path.display())]
    UnknownFormat { path: PathBuf },
}

impl ConfigError {
    pub(crate) fn syntax(
        path: impl Into<PathBuf>,
        format: ConfigFormat,
        source: impl Into<BoxedSource>,
    ) -> Self {
        Self::Syntax {
            path: path.into(),
            format,
            source: source.into(),
        }
    }
}
