//! Persisted user settings, including the gamification state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{debug, trace, warn};

/// Settings persistence error.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("No configuration directory available for settings")]
    NoSettingsDir,
}

/// Everything the tool remembers between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: String,
    pub scan_interval_hours: u32,
    pub points: u32,
    pub points_history: Vec<u32>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub lighthouse_state: u8,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: "en-GB".to_string(),
            scan_interval_hours: 24,
            points: 0,
            points_history: Vec::new(),
            timestamps: Vec::new(),
            lighthouse_state: 0,
        }
    }
}

impl UserSettings {
    /// Drop unpaired history entries so both series have the same length.
    pub fn normalize(&mut self) {
        let len = self.points_history.len().min(self.timestamps.len());
        if self.points_history.len() != self.timestamps.len() {
            warn!(
                points = self.points_history.len(),
                timestamps = self.timestamps.len(),
                "Points history and timestamps differ in length, truncating"
            );
        }
        self.points_history.truncate(len);
        self.timestamps.truncate(len);
    }
}

/// Where user settings live.
pub trait SettingsStore: Send + Sync {
    /// Current settings, or defaults when nothing usable is stored.
    fn load(&self) -> UserSettings;

    fn save(&self, settings: &UserSettings) -> Result<(), SettingsError>;
}

/// Settings stored as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/posture-audit/settings.json`.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|d| d.join("posture-audit").join("settings.json"))
            .ok_or(SettingsError::NoSettingsDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings file. `Ok(None)` when it does not exist.
    pub fn try_load(&self) -> Result<Option<UserSettings>, SettingsError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| SettingsError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        let mut settings: UserSettings =
            serde_json::from_str(&content).map_err(|e| SettingsError::Parse {
                path: self.path.clone(),
                source: e,
            })?;
        settings.normalize();
        Ok(Some(settings))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> UserSettings {
        match self.try_load() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                debug!(path = %self.path.display(), "No settings file, using defaults");
                UserSettings::default()
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable settings, using defaults");
                UserSettings::default()
            }
        }
    }

    fn save(&self, settings: &UserSettings) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(settings).map_err(SettingsError::Serialize)?;
        let write_err = |path: &Path, e: std::io::Error| SettingsError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| write_err(parent, e))?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| write_err(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            write_err(&self.path, e)
        })?;

        trace!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

/// In-memory settings, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<UserSettings>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemorySettingsStore {
    pub fn new(settings: UserSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
            ..Self::default()
        }
    }

    /// Make every subsequent `save` fail.
    pub fn failing_saves(self) -> Self {
        self.fail_saves.store(true, Ordering::SeqCst);
        self
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> UserSettings {
        let mut settings = self
            .settings
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default();
        settings.normalize();
        settings
    }

    fn save(&self, settings: &UserSettings) -> Result<(), SettingsError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SettingsError::Write {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "saves disabled"),
            });
        }
        let mut stored = self.settings.lock().map_err(|_| SettingsError::Write {
            path: PathBuf::from("<memory>"),
            source: std::io::Error::other("settings lock poisoned"),
        })?;
        *stored = settings.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
