//! The uniform result every probe returns.

pub mod ids;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a probe across the whole registry.
pub type ProbeId = u32;

/// Identifies the outcome branch a probe reached, scoped to its `ProbeId`.
pub type OutcomeId = i32;

/// Outcome id carried by every failed check.
pub const UNDETERMINED: OutcomeId = -1;

/// Why a probe could not determine its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    message: String,
}

impl CheckFailure {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of a single probe.
///
/// A check is either a success (no failure, `outcome_id >= 0`) or a failure
/// (failure present, `outcome_id == UNDETERMINED`). The fields are private so the
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCheckResult", into = "RawCheckResult")]
pub struct CheckResult {
    probe_id: ProbeId,
    outcome_id: OutcomeId,
    details: Vec<String>,
    failure: Option<CheckFailure>,
}

impl CheckResult {
    /// A successful check.
    ///
    /// Negative outcome ids are reserved, so passing one yields a failed check
    /// rather than an outcome the catalog could score.
    pub fn new<I, S>(probe_id: ProbeId, outcome_id: OutcomeId, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if outcome_id < 0 {
            return Self::failed(probe_id, "invalid outcome", outcome_id);
        }
        Self {
            probe_id,
            outcome_id,
            details: details.into_iter().map(Into::into).collect(),
            failure: None,
        }
    }

    /// A successful check without evidence.
    pub fn outcome(probe_id: ProbeId, outcome_id: OutcomeId) -> Self {
        Self::new(probe_id, outcome_id, Vec::<String>::new())
    }

    /// A failed check. The message reads `"<context>: <error>"`.
    pub fn failed(probe_id: ProbeId, context: &str, error: impl fmt::Display) -> Self {
        Self {
            probe_id,
            outcome_id: UNDETERMINED,
            details: Vec::new(),
            failure: Some(CheckFailure {
                message: format!("{}: {}", context, error),
            }),
        }
    }

    pub fn probe_id(&self) -> ProbeId {
        self.probe_id
    }

    pub fn outcome_id(&self) -> OutcomeId {
        self.outcome_id
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    pub fn failure(&self) -> Option<&CheckFailure> {
        self.failure.as_ref()
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Serialized form of a `CheckResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCheckResult {
    probe_id: ProbeId,
    outcome_id: OutcomeId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<CheckResult> for RawCheckResult {
    fn from(result: CheckResult) -> Self {
        Self {
            probe_id: result.probe_id,
            outcome_id: result.outcome_id,
            details: result.details,
            error: result.failure.map(|f| f.message),
        }
    }
}

impl TryFrom<RawCheckResult> for CheckResult {
    type Error = String;

    fn try_from(raw: RawCheckResult) -> Result<Self, Self::Error> {
        match (raw.error, raw.outcome_id) {
            (Some(message), UNDETERMINED) => Ok(Self {
                probe_id: raw.probe_id,
                outcome_id: UNDETERMINED,
                details: raw.details,
                failure: Some(CheckFailure { message }),
            }),
            (None, outcome) if outcome >= 0 => Ok(Self {
                probe_id: raw.probe_id,
                outcome_id: outcome,
                details: raw.details,
                failure: None,
            }),
            (Some(_), outcome) => Err(format!(
                "probe {}: failed check must carry outcome {}, found {}",
                raw.probe_id, UNDETERMINED, outcome
            )),
            (None, outcome) => Err(format!(
                "probe {}: successful check has reserved outcome {}",
                raw.probe_id, outcome
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_failure() {
        let result = CheckResult::new(ids::UAC, 2, ["UAC is turned on"]);
        assert!(!result.is_failure());
        assert_eq!(result.outcome_id(), 2);
        assert_eq!(result.details(), ["UAC is turned on"]);
    }

    #[test]
    fn test_failure_carries_sentinel() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such key");
        let result = CheckResult::failed(ids::SECURE_BOOT, "error opening registry key", err);
        assert!(result.is_failure());
        assert_eq!(result.outcome_id(), UNDETERMINED);
        assert_eq!(
            result.failure().map(CheckFailure::message),
            Some("error opening registry key: no such key")
        );
    }

    #[test]
    fn test_negative_outcome_is_undetermined() {
        let result = CheckResult::outcome(ids::SMB, -4);
        assert!(result.is_failure());
        assert_eq!(result.outcome_id(), UNDETERMINED);
        assert_eq!(
            result.failure().map(CheckFailure::message),
            Some("invalid outcome: -4")
        );

        let sentinel = CheckResult::new(ids::UAC, UNDETERMINED, ["evidence"]);
        assert!(sentinel.is_failure());
        assert!(sentinel.details().is_empty());
    }

    #[test]
    fn test_failure_iff_undetermined() {
        let samples = vec![
            CheckResult::outcome(1, 0),
            CheckResult::new(2, 7, ["a", "b"]),
            CheckResult::failed(3, "ctx", "boom"),
            CheckResult::outcome(4, -1),
        ];
        for result in samples {
            assert_eq!(result.is_failure(), result.outcome_id() == UNDETERMINED);
        }
    }

    #[test]
    fn test_json_shape() {
        let result = CheckResult::new(ids::WEBCAM, 0, ["microsoft webcam"]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["probe_id"], 8);
        assert_eq!(json["outcome_id"], 0);
        assert_eq!(json["details"][0], "microsoft webcam");
        assert!(json.get("error").is_none());

        let failed = serde_json::to_value(CheckResult::failed(8, "ctx", "boom")).unwrap();
        assert_eq!(failed["outcome_id"], -1);
        assert_eq!(failed["error"], "ctx: boom");
    }

    #[test]
    fn test_deserialize_rejects_mixed_state() {
        let mixed = r#"{"probe_id": 1, "outcome_id": 2, "error": "boom"}"#;
        assert!(serde_json::from_str::<CheckResult>(mixed).is_err());

        let neither = r#"{"probe_id": 1, "outcome_id": -1}"#;
        assert!(serde_json::from_str::<CheckResult>(neither).is_err());

        let ok = r#"{"probe_id": 1, "outcome_id": -1, "error": "boom"}"#;
        let parsed: CheckResult = serde_json::from_str(ok).unwrap();
        assert!(parsed.is_failure());
    }
}
