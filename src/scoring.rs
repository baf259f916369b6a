use crate::resolver::ScoredResult;
use serde::{Deserialize, Serialize};

/// Severities in `0..COUNTED_TIERS` add to the points total; anything else is
/// informational.
pub const COUNTED_TIERS: i32 = 4;

/// Display tier of a catalog severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Acceptable,
    Low,
    Medium,
    High,
    Info,
}

impl SeverityTier {
    /// Negative severities have no tier.
    pub fn from_severity(severity: i32) -> Option<Self> {
        match severity {
            0 => Some(SeverityTier::Acceptable),
            1 => Some(SeverityTier::Low),
            2 => Some(SeverityTier::Medium),
            3 => Some(SeverityTier::High),
            s if s >= COUNTED_TIERS => Some(SeverityTier::Info),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Acceptable => "ACCEPTABLE",
            SeverityTier::Low => "LOW",
            SeverityTier::Medium => "MEDIUM",
            SeverityTier::High => "HIGH",
            SeverityTier::Info => "INFO",
        }
    }

    pub fn is_counted(&self) -> bool {
        !matches!(self, SeverityTier::Info)
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether `severity` contributes to the points total.
pub fn is_counted(severity: i32) -> bool {
    (0..COUNTED_TIERS).contains(&severity)
}

/// Sum of all counted severities. Recomputed from scratch on every call.
pub fn aggregate(scored: &[ScoredResult]) -> u32 {
    scored
        .iter()
        .filter(|s| is_counted(s.severity))
        .map(|s| s.severity.unsigned_abs())
        .sum()
}

/// Number of resolved results per tier, plus the points they add up to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub points: u32,
    pub acceptable: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub info: usize,
    /// Severities outside every tier.
    pub out_of_range: usize,
}

impl ScoreBreakdown {
    pub fn from_scored(scored: &[ScoredResult]) -> Self {
        let mut breakdown = ScoreBreakdown {
            points: aggregate(scored),
            ..Default::default()
        };

        for s in scored {
            match SeverityTier::from_severity(s.severity) {
                Some(SeverityTier::Acceptable) => breakdown.acceptable += 1,
                Some(SeverityTier::Low) => breakdown.low += 1,
                Some(SeverityTier::Medium) => breakdown.medium += 1,
                Some(SeverityTier::High) => breakdown.high += 1,
                Some(SeverityTier::Info) => breakdown.info += 1,
                None => breakdown.out_of_range += 1,
            }
        }

        breakdown
    }

    pub fn counted(&self) -> usize {
        self.acceptable + self.low + self.medium + self.high
    }
}
