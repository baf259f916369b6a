//! Severity resolution: turns probe outcomes into severities via the catalog.

use crate::catalog::{LookupMiss, SeverityCatalog, severity_of};
use crate::check::{CheckResult, ProbeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A probe outcome the catalog could assign a severity to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub probe_id: ProbeId,
    pub severity: i32,
}

/// Resolve the severity of every determinable result, in input order.
///
/// Failed results, catalog misses and entries without a numeric severity are
/// skipped; none of them is an error.
pub fn resolve(catalog: &SeverityCatalog, results: &[CheckResult]) -> Vec<ScoredResult> {
    results
        .iter()
        .filter_map(|result| resolve_one(catalog, result))
        .collect()
}

fn resolve_one(catalog: &SeverityCatalog, result: &CheckResult) -> Option<ScoredResult> {
    let probe_id = result.probe_id();

    if let Some(failure) = result.failure() {
        debug!(probe_id, error = %failure, "Skipping failed check");
        return None;
    }

    let outcome_id = result.outcome_id();
    let entry = match catalog.lookup(probe_id, outcome_id) {
        Ok(entry) => entry,
        Err(LookupMiss::Probe) => {
            debug!(probe_id, "Probe not found in severity catalog");
            return None;
        }
        Err(LookupMiss::Outcome) => {
            debug!(probe_id, outcome_id, "Outcome not found in severity catalog");
            return None;
        }
    };

    match severity_of(entry) {
        Some(severity) => Some(ScoredResult { probe_id, severity }),
        None => {
            debug!(probe_id, outcome_id, "Catalog entry has no numeric severity");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> SeverityCatalog {
        SeverityCatalog::from_value(json!({
            "1": {"0": {"Severity": 3}, "1": {"Severity": 4}},
            "2": {"0": {"Severity": 1}, "1": {"Severity": null}},
            "3": {"0": {"Name": "no severity"}}
        }))
        .unwrap()
    }

    #[test]
    fn test_resolves_in_order() {
        let results = vec![
            CheckResult::outcome(2, 0),
            CheckResult::outcome(1, 0),
            CheckResult::outcome(1, 1),
        ];
        let scored = resolve(&catalog(), &results);
        assert_eq!(
            scored,
            vec![
                ScoredResult { probe_id: 2, severity: 1 },
                ScoredResult { probe_id: 1, severity: 3 },
                ScoredResult { probe_id: 1, severity: 4 },
            ]
        );
    }

    #[test]
    fn test_missing_probe_is_skipped() {
        let results = vec![CheckResult::outcome(7, 3)];
        assert!(resolve(&catalog(), &results).is_empty());
    }

    #[test]
    fn test_missing_outcome_is_skipped() {
        let results = vec![CheckResult::outcome(1, 9)];
        assert!(resolve(&catalog(), &results).is_empty());
    }

    #[test]
    fn test_failed_results_are_skipped() {
        let results = vec![
            CheckResult::failed(1, "error opening key", "access denied"),
            CheckResult::outcome(2, 0),
        ];
        let scored = resolve(&catalog(), &results);
        assert_eq!(scored, vec![ScoredResult { probe_id: 2, severity: 1 }]);
    }

    #[test]
    fn test_reserved_outcome_is_not_scored() {
        let catalog = SeverityCatalog::from_value(json!({
            "13": {"0": {"Severity": 3}}
        }))
        .unwrap();
        let results = vec![CheckResult::new(13, -1, ["UAC state unknown"])];

        let scored = resolve(&catalog, &results);
        assert!(scored.is_empty());
        assert_eq!(crate::scoring::aggregate(&scored), 0);
    }

    #[test]
    fn test_invalid_severity_is_skipped() {
        let results = vec![CheckResult::outcome(2, 1), CheckResult::outcome(3, 0)];
        assert!(resolve(&catalog(), &results).is_empty());
    }

    #[test]
    fn test_resolve_is_repeatable() {
        let catalog = catalog();
        let results = vec![
            CheckResult::outcome(1, 0),
            CheckResult::outcome(7, 3),
            CheckResult::outcome(2, 0),
        ];
        assert_eq!(resolve(&catalog, &results), resolve(&catalog, &results));
    }
}
