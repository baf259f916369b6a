//! Browser profile and user identity lookup.

use super::ProbeError;
use std::fs;
use std::path::PathBuf;

/// Chromium-based browsers with a per-user `Preferences` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromiumBrowser {
    Chrome,
    Edge,
}

impl ChromiumBrowser {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChromiumBrowser::Chrome => "chrome",
            ChromiumBrowser::Edge => "edge",
        }
    }

    /// Location of the default profile's `Preferences`, relative to the local
    /// data directory.
    pub fn preferences_path(&self) -> PathBuf {
        let vendor = match self {
            ChromiumBrowser::Chrome => ["Google", "Chrome"],
            ChromiumBrowser::Edge => ["Microsoft", "Edge"],
        };
        PathBuf::from(vendor[0])
            .join(vendor[1])
            .join("User Data")
            .join("Default")
            .join("Preferences")
    }
}

/// Locates browser profile directories.
pub trait ProfileFinder: Send + Sync {
    /// Firefox profile directories that contain a `logins.json`.
    fn firefox_profiles(&self) -> Result<Vec<PathBuf>, ProbeError>;

    /// The `Preferences` file of `browser`'s default profile.
    fn chromium_preferences(&self, browser: ChromiumBrowser) -> Result<PathBuf, ProbeError>;
}

/// Finds profiles under the platform data directories
/// (`%APPDATA%` for Firefox, `%LOCALAPPDATA%` for Chromium on Windows).
#[derive(Debug, Clone, Default)]
pub struct DataDirProfileFinder {
    root: Option<PathBuf>,
    local_root: Option<PathBuf>,
}

impl DataDirProfileFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search below `root` instead of the platform data directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            local_root: None,
        }
    }

    /// Resolve Chromium profiles below `root` instead of the local data
    /// directory.
    pub fn with_local_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local_root = Some(root.into());
        self
    }

    fn profiles_dir(&self) -> Result<PathBuf, ProbeError> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("Mozilla").join("Firefox").join("Profiles"))
            .ok_or_else(|| ProbeError::UnexpectedOutput("no data directory".to_string()))
    }
}

impl ProfileFinder for DataDirProfileFinder {
    fn firefox_profiles(&self) -> Result<Vec<PathBuf>, ProbeError> {
        let dir = self.profiles_dir()?;
        let entries = fs::read_dir(&dir).map_err(|e| ProbeError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let mut profiles: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir() && p.join("logins.json").is_file())
            .collect();
        profiles.sort();
        Ok(profiles)
    }

    fn chromium_preferences(&self, browser: ChromiumBrowser) -> Result<PathBuf, ProbeError> {
        let local = self
            .local_root
            .clone()
            .or_else(dirs::data_local_dir)
            .ok_or_else(|| ProbeError::UnexpectedOutput("no local data directory".to_string()))?;
        let path = local.join(browser.preferences_path());
        if !path.is_file() {
            return Err(ProbeError::Io {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} is not installed", browser.as_str()),
                ),
            });
        }
        Ok(path)
    }
}

/// Provides the name of the logged-in user.
pub trait UsernameRetriever: Send + Sync {
    fn current_username(&self) -> Result<String, ProbeError>;
}

/// Reads `USERNAME` (Windows) or `USER` from the environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvUsernameRetriever;

impl UsernameRetriever for EnvUsernameRetriever {
    fn current_username(&self) -> Result<String, ProbeError> {
        std::env::var("USERNAME")
            .or_else(|_| std::env::var("USER"))
            .map_err(|_| ProbeError::UnexpectedOutput("current user is unknown".to_string()))
    }
}
