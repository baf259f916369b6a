//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Main configuration structure for posture-audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Severity catalog JSON used for scoring.
    pub catalog: Option<PathBuf>,
    /// Settings file; defaults to `<config_dir>/posture-audit/settings.json`.
    pub settings: Option<PathBuf>,
    pub scan: ScanConfig,
    pub probes: ProbesConfig,
}

/// Scan configuration (corresponds to CLI options).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Output format: "terminal" or "json".
    pub format: Option<String>,
    /// CI mode: non-interactive output.
    pub ci: bool,
    pub verbose: bool,
    /// Skip scoring and trust level tracking.
    pub no_game: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbesConfig {
    /// Probe names left out of the registry.
    pub disabled: HashSet<String>,
}
