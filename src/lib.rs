pub mod adapters;
pub mod catalog;
pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod handlers;
pub mod logging;
pub mod probes;
pub mod progress;
pub mod reporter;
pub mod resolver;
pub mod scan;
pub mod scoring;
pub mod settings;

#[cfg(test)]
pub mod test_utils;

pub use catalog::{CatalogEntry, CatalogError, SeverityCatalog};
pub use check::{CheckFailure, CheckResult, OutcomeId, ProbeId, UNDETERMINED};
pub use cli::{Cli, OutputFormat};
pub use config::{Config, EffectiveConfig};
pub use error::AuditError;
pub use game::{
    CatalogFile, GameState, PointCalculator, ScanHistory, TrustLevel, sufficient_activity,
    transition, transition_at, update_game_state,
};
pub use progress::{ProgressError, ProgressSink, SilentProgress, TerminalProgress};
pub use reporter::{Reporter, ScanReport, json::JsonReporter, terminal::TerminalReporter};
pub use resolver::{ScoredResult, resolve};
pub use scan::{CheckRegistry, HostAdapters, ScanError, ScanOutcome, run_scan};
pub use scoring::{ScoreBreakdown, SeverityTier, aggregate};
pub use settings::{
    FileSettingsStore, MemorySettingsStore, SettingsError, SettingsStore, UserSettings,
};
