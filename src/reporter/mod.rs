pub mod json;
pub mod terminal;

use crate::catalog::SeverityCatalog;
use crate::check::{CheckResult, OutcomeId, ProbeId};
use crate::game::GameState;
use crate::resolver::ScoredResult;
use crate::scoring::{ScoreBreakdown, SeverityTier};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub trait Reporter {
    fn report(&self, report: &ScanReport) -> String;
}

/// One check as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub name: String,
    pub probe_id: ProbeId,
    pub outcome_id: OutcomeId,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    /// Why the check could not be determined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_key: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<SeverityTier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remediation: Vec<String>,
}

impl CheckReport {
    fn new(name: &str, result: &CheckResult, catalog: Option<&SeverityCatalog>) -> Self {
        let entry = match (catalog, result.is_failure()) {
            (Some(catalog), false) => catalog.entry(result.probe_id(), result.outcome_id()),
            _ => None,
        };
        let severity = entry.as_ref().and_then(|e| e.severity);

        Self {
            name: name.to_string(),
            probe_id: result.probe_id(),
            outcome_id: result.outcome_id(),
            details: result.details().to_vec(),
            error: result.failure().map(|f| f.message().to_string()),
            catalog_key: entry.as_ref().map(|e| e.catalog_key),
            issue: entry.as_ref().and_then(|e| e.name.clone()),
            severity,
            tier: severity.and_then(SeverityTier::from_severity),
            remediation: entry.map(|e| e.remediation).unwrap_or_default(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Everything a reporter renders for one run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub version: String,
    pub scanned_at: DateTime<Utc>,
    /// The scan stopped before every check ran.
    pub aborted: bool,
    pub checks: Vec<CheckReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<GameState>,
}

impl ScanReport {
    /// `names` are the registry names; results line up with them by position.
    pub fn new(names: &[&str], results: &[CheckResult], catalog: Option<&SeverityCatalog>) -> Self {
        let checks = results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let name = names.get(i).copied().unwrap_or("unknown");
                CheckReport::new(name, result, catalog)
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            scanned_at: Utc::now(),
            aborted: false,
            checks,
            score: None,
            game: None,
        }
    }

    pub fn with_aborted(mut self, aborted: bool) -> Self {
        self.aborted = aborted;
        self
    }

    pub fn with_score(mut self, scored: &[ScoredResult]) -> Self {
        self.score = Some(ScoreBreakdown::from_scored(scored));
        self
    }

    pub fn with_game(mut self, game: GameState) -> Self {
        self.game = Some(game);
        self
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.is_failure()).count()
    }
}
