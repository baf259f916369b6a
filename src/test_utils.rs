//! Shared test helpers.

pub mod fixtures {
    use crate::cli::OutputFormat;
    use crate::config::EffectiveConfig;
    use std::collections::HashSet;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Catalog entries for UAC (13) and Secure Boot (14).
    pub const CATALOG_JSON: &str = r#"{
  "13": {
    "0": {"Severity": 3, "Name": "UAC is disabled", "Solution": ["Enable UAC in the control panel"]},
    "1": {"Severity": 0, "Name": "UAC is fully enabled"}
  },
  "14": {
    "0": {"Severity": 2, "Name": "Secure Boot is disabled"},
    "1": {"Severity": 0, "Name": "Secure Boot is enabled"}
  }
}"#;

    /// Write [`CATALOG_JSON`] into `dir` and return its path.
    pub fn write_catalog(dir: &Path) -> PathBuf {
        let path = dir.join("catalog.json");
        fs::write(&path, CATALOG_JSON).unwrap();
        path
    }

    pub fn effective_config(catalog: Option<PathBuf>) -> EffectiveConfig {
        EffectiveConfig {
            format: OutputFormat::Terminal,
            ci: true,
            verbose: false,
            no_game: false,
            catalog,
            settings: None,
            output: None,
            disabled_probes: HashSet::new(),
        }
    }
}
