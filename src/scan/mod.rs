//! Scan orchestration.
//!
//! Runs every probe of a [`CheckRegistry`] in order, reporting progress as it
//! goes. Probes encode their own failures, so a scan only stops early when the
//! progress sink fails.

pub mod registry;

pub use registry::{CheckRegistry, HostAdapters, Probe, ProbeFn};

use crate::check::CheckResult;
use crate::progress::{ProgressError, ProgressSink};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a scan did not finish cleanly.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The progress sink failed; the remaining probes were not run.
    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// Every probe ran, but the audit record could not be produced.
    #[error("Failed to serialize scan results: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Results of a scan plus the error that cut it short, if any.
#[derive(Debug)]
pub struct ScanOutcome {
    /// One result per probe that ran, in registry order.
    pub results: Vec<CheckResult>,
    pub error: Option<ScanError>,
}

impl ScanOutcome {
    /// True when the progress sink stopped the scan before every probe ran.
    pub fn is_aborted(&self) -> bool {
        matches!(self.error, Some(ScanError::Progress(_)))
    }

    pub fn failed_checks(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| r.is_failure())
    }
}

/// Percentage of the scan complete after probe `index` (zero-based), truncated.
pub fn progress_percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (((index + 1) * 100) / total).min(100) as u8
}

/// Run all probes of `registry` sequentially.
///
/// For each probe the sink first receives `"Running check i of n"`, then the
/// probe runs, then the sink receives the new percentage. Any sink failure
/// returns immediately with the results gathered so far.
pub fn run_scan(registry: &CheckRegistry, sink: &mut dyn ProgressSink) -> ScanOutcome {
    let total = registry.len();
    let mut results = Vec::with_capacity(total);

    info!(total, "Starting scan");

    for (index, probe) in registry.iter().enumerate() {
        if let Err(e) = sink.set_text(&format!("Running check {} of {}", index + 1, total)) {
            warn!(error = %e, index, "Error setting progress text");
            return ScanOutcome {
                results,
                error: Some(e.into()),
            };
        }

        let result = probe.run();
        match result.failure() {
            Some(failure) => debug!(
                probe = probe.name(),
                probe_id = result.probe_id(),
                error = %failure,
                "Check could not be determined"
            ),
            None => debug!(
                probe = probe.name(),
                probe_id = result.probe_id(),
                outcome_id = result.outcome_id(),
                "Check completed"
            ),
        }
        results.push(result);

        if let Err(e) = sink.set_percent(progress_percent(index, total)) {
            warn!(error = %e, index, "Error setting progress value");
            return ScanOutcome {
                results,
                error: Some(e.into()),
            };
        }
    }

    let error = match serde_json::to_string_pretty(&results) {
        Ok(json) => {
            info!(results = %json, "Scan results");
            None
        }
        Err(e) => {
            warn!(error = %e, "Error serializing scan results");
            Some(ScanError::Serialize(e))
        }
    };

    ScanOutcome { results, error }
}
