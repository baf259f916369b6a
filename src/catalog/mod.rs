//! Severity catalog: reference data mapping probe outcomes to risk and advice.
//!
//! The catalog is JSON keyed by probe id, then outcome id:
//!
//! ```json
//! {
//!   "13": {
//!     "0": { "Severity": 3, "Name": "UAC disabled", "Solution": ["..."], "Screenshots": [] }
//!   }
//! }
//! ```
//!
//! Entries are kept as raw JSON so one malformed entry only affects its own
//! lookup.

mod error;

pub use error::CatalogError;

use crate::check::{OutcomeId, ProbeId};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Which level of a catalog lookup came up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMiss {
    Probe,
    Outcome,
}

/// Read-only severity catalog.
#[derive(Debug, Clone, Default)]
pub struct SeverityCatalog {
    entries: HashMap<ProbeId, HashMap<OutcomeId, Value>>,
}

impl SeverityCatalog {
    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        trace!(path = %path.display(), "Loading severity catalog");
        let content = fs::read_to_string(path).map_err(|e| CatalogError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content).map_err(|e| CatalogError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, HashMap<String, Value>> = serde_json::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, HashMap<String, Value>> = serde_json::from_value(value)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: HashMap<String, HashMap<String, Value>>) -> Self {
        let mut entries: HashMap<ProbeId, HashMap<OutcomeId, Value>> = HashMap::new();

        for (probe_key, outcomes) in raw {
            let Ok(probe_id) = probe_key.trim().parse::<ProbeId>() else {
                debug!(key = %probe_key, "Skipping non-numeric probe key in catalog");
                continue;
            };
            let by_outcome = entries.entry(probe_id).or_default();
            for (outcome_key, value) in outcomes {
                match outcome_key.trim().parse::<OutcomeId>() {
                    Ok(outcome_id) => {
                        by_outcome.insert(outcome_id, value);
                    }
                    Err(_) => {
                        debug!(probe_id, key = %outcome_key, "Skipping non-numeric outcome key in catalog");
                    }
                }
            }
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw JSON entry for `(probe_id, outcome_id)`.
    pub fn lookup(&self, probe_id: ProbeId, outcome_id: OutcomeId) -> Result<&Value, LookupMiss> {
        self.entries
            .get(&probe_id)
            .ok_or(LookupMiss::Probe)?
            .get(&outcome_id)
            .ok_or(LookupMiss::Outcome)
    }

    /// Typed view of an entry, if present.
    pub fn entry(&self, probe_id: ProbeId, outcome_id: OutcomeId) -> Option<CatalogEntry> {
        self.lookup(probe_id, outcome_id)
            .ok()
            .map(|v| CatalogEntry::from_value(probe_id, outcome_id, v))
    }
}

/// Descriptive metadata for one probe outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Key of the localized issue text shown to the user.
    pub catalog_key: i64,
    /// `None` when the entry has no usable numeric severity.
    pub severity: Option<i32>,
    pub name: Option<String>,
    pub remediation: Vec<String>,
    pub evidence_refs: Vec<String>,
}

impl CatalogEntry {
    pub fn from_value(probe_id: ProbeId, outcome_id: OutcomeId, value: &Value) -> Self {
        let catalog_key = field(value, "JsonKey", "json_key")
            .and_then(Value::as_i64)
            .unwrap_or_else(|| i64::from(probe_id) * 10 + i64::from(outcome_id));

        Self {
            catalog_key,
            severity: severity_of(value),
            name: field(value, "Name", "name")
                .and_then(Value::as_str)
                .map(str::to_string),
            remediation: string_list(field(value, "Solution", "solution")),
            evidence_refs: string_list(field(value, "Screenshots", "screenshots")),
        }
    }
}

/// Numeric `Severity` of a raw entry, truncated toward zero.
pub fn severity_of(value: &Value) -> Option<i32> {
    field(value, "Severity", "severity")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite())
        .map(|s| s.trunc() as i32)
}

fn field<'a>(value: &'a Value, name: &str, alt: &str) -> Option<&'a Value> {
    value.get(name).or_else(|| value.get(alt))
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}
