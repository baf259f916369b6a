//! Append-only scan history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points recorded for one completed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub points: u32,
    pub timestamp: DateTime<Utc>,
}

/// Points and timestamps of every scored scan, oldest first.
///
/// Entries can only be appended, so the two series exposed by
/// [`ScanHistory::points_history`] and [`ScanHistory::timestamps`] always have
/// the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SplitHistory", into = "SplitHistory")]
pub struct ScanHistory {
    entries: Vec<HistoryEntry>,
}

impl ScanHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair up stored series by index. Unpaired trailing values are dropped.
    pub fn from_series(points: &[u32], timestamps: &[DateTime<Utc>]) -> Self {
        Self {
            entries: points
                .iter()
                .zip(timestamps)
                .map(|(&points, &timestamp)| HistoryEntry { points, timestamp })
                .collect(),
        }
    }

    pub fn push(&mut self, points: u32, timestamp: DateTime<Utc>) {
        self.entries.push(HistoryEntry { points, timestamp });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timestamp of the very first recorded scan.
    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.entries.first().map(|e| e.timestamp)
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn points_history(&self) -> Vec<u32> {
        self.entries.iter().map(|e| e.points).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.entries.iter().map(|e| e.timestamp).collect()
    }
}

#[derive(Serialize, Deserialize)]
struct SplitHistory {
    #[serde(default)]
    points_history: Vec<u32>,
    #[serde(default)]
    timestamps: Vec<DateTime<Utc>>,
}

impl From<SplitHistory> for ScanHistory {
    fn from(split: SplitHistory) -> Self {
        Self::from_series(&split.points_history, &split.timestamps)
    }
}

impl From<ScanHistory> for SplitHistory {
    fn from(history: ScanHistory) -> Self {
        Self {
            points_history: history.points_history(),
            timestamps: history.timestamps(),
        }
    }
}
