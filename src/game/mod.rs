//! Gamification: converts scan scores into a trust level that rewards keeping
//! a clean posture over time.

mod history;

pub use history::{HistoryEntry, ScanHistory};

use crate::catalog::{CatalogError, SeverityCatalog};
use crate::check::CheckResult;
use crate::resolver::resolve;
use crate::scoring::aggregate;
use crate::settings::{SettingsStore, UserSettings};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Days since the first recorded scan before any level above the floor is reachable.
pub const ACTIVITY_DAYS: i64 = 7;

/// Points ceilings (exclusive) and the level each one earns, best first.
const LEVEL_THRESHOLDS: [(u32, u8); 5] = [(10, 5), (20, 4), (30, 3), (40, 2), (50, 1)];

/// Trust level from 1 (floor) to 5 (best).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TrustLevel(u8);

impl TrustLevel {
    pub const MIN: TrustLevel = TrustLevel(1);
    pub const MAX: TrustLevel = TrustLevel(5);

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&level)
            .then_some(TrustLevel(level))
    }

    /// Level from persisted settings; unset or out-of-range values map to the floor.
    pub fn from_stored(level: u8) -> Self {
        Self::new(level).unwrap_or(Self::MIN)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for TrustLevel {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u8> for TrustLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("trust level {} out of range 1..=5", level))
    }
}

impl From<TrustLevel> for u8 {
    fn from(level: TrustLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX.0)
    }
}

/// Gamification state carried between scans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Score of the latest scan; lower is better.
    pub points: u32,
    pub history: ScanHistory,
    pub trust_level: TrustLevel,
}

impl GameState {
    pub fn from_settings(settings: &UserSettings) -> Self {
        Self {
            points: settings.points,
            history: ScanHistory::from_series(&settings.points_history, &settings.timestamps),
            trust_level: TrustLevel::from_stored(settings.lighthouse_state),
        }
    }

    /// Copy the game fields into `settings`, leaving the rest untouched.
    pub fn write_to(&self, settings: &mut UserSettings) {
        settings.points = self.points;
        settings.points_history = self.history.points_history();
        settings.timestamps = self.history.timestamps();
        settings.lighthouse_state = self.trust_level.get();
    }
}

/// True when the first recorded scan is more than [`ACTIVITY_DAYS`] old.
pub fn sufficient_activity(state: &GameState, now: DateTime<Utc>) -> bool {
    state
        .history
        .first_timestamp()
        .is_some_and(|first| now - first > Duration::days(ACTIVITY_DAYS))
}

/// Recompute the trust level as of `now`.
pub fn transition_at(mut state: GameState, now: DateTime<Utc>) -> GameState {
    let active = sufficient_activity(&state, now);
    let level = LEVEL_THRESHOLDS
        .iter()
        .find(|(ceiling, _)| active && state.points < *ceiling)
        .map_or(1, |&(_, level)| level);

    state.trust_level = TrustLevel::from_stored(level);
    state
}

pub fn transition(state: GameState) -> GameState {
    transition_at(state, Utc::now())
}

/// Scores a scan into a game state: sets `points` and appends to the history.
pub trait PointCalculator {
    fn calculate(&self, state: GameState, results: &[CheckResult]) -> Result<GameState, CatalogError>;
}

/// Score `results` against `catalog` and record the scan at `now`.
pub fn score_scan(
    mut state: GameState,
    catalog: &SeverityCatalog,
    results: &[CheckResult],
    now: DateTime<Utc>,
) -> GameState {
    let scored = resolve(catalog, results);
    state.points = aggregate(&scored);
    state.history.push(state.points, now);
    debug!(points = state.points, resolved = scored.len(), "Scan scored");
    state
}

impl PointCalculator for SeverityCatalog {
    fn calculate(&self, state: GameState, results: &[CheckResult]) -> Result<GameState, CatalogError> {
        Ok(score_scan(state, self, results, Utc::now()))
    }
}

/// Loads the catalog from disk on every calculation.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    path: PathBuf,
}

impl CatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PointCalculator for CatalogFile {
    fn calculate(&self, state: GameState, results: &[CheckResult]) -> Result<GameState, CatalogError> {
        let catalog = SeverityCatalog::load(&self.path)?;
        catalog.calculate(state, results)
    }
}

/// Load the stored game state, score `results`, move the trust level and save.
///
/// Scoring errors are returned before anything is saved. A failed save is only
/// logged; the updated state is still returned.
pub fn update_game_state(
    results: &[CheckResult],
    calculator: &dyn PointCalculator,
    store: &dyn SettingsStore,
) -> Result<GameState, CatalogError> {
    let state = GameState::from_settings(&store.load());
    let state = calculator.calculate(state, results)?;
    let state = transition(state);

    let mut settings = store.load();
    state.write_to(&mut settings);
    match store.save(&settings) {
        Ok(()) => info!(
            points = state.points,
            trust_level = state.trust_level.get(),
            "Game state updated"
        ),
        Err(e) => warn!(error = %e, "Gamification settings not saved"),
    }

    Ok(state)
}
