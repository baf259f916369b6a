//! Scan mode handler.

use crate::catalog::SeverityCatalog;
use crate::cli::{Cli, OutputFormat};
use crate::config::{Config, EffectiveConfig};
use crate::error::AuditError;
use crate::game::update_game_state;
use crate::progress::{ProgressSink, TerminalProgress};
use crate::reporter::{Reporter, ScanReport, json::JsonReporter, terminal::TerminalReporter};
use crate::resolver::resolve;
use crate::scan::{CheckRegistry, HostAdapters, ScanError, ScanOutcome, run_scan};
use crate::settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};
use std::fs;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{debug, info, warn};

/// Report of one run plus the first error that should fail it.
#[derive(Debug)]
pub struct AuditOutcome {
    pub report: ScanReport,
    pub error: Option<AuditError>,
}

impl AuditOutcome {
    /// 0 completed, 1 aborted by the progress channel, 2 any other error.
    pub fn exit_status(&self) -> u8 {
        match &self.error {
            None => 0,
            Some(AuditError::Scan(ScanError::Progress(_))) => 1,
            Some(_) => 2,
        }
    }
}

/// Run the registry, score it when a catalog is configured and update the
/// game state unless disabled or the scan was cut short.
pub fn run_audit(
    effective: &EffectiveConfig,
    registry: &CheckRegistry,
    sink: &mut dyn ProgressSink,
    store: &dyn SettingsStore,
) -> AuditOutcome {
    let ScanOutcome { results, error } = run_scan(registry, sink);
    let aborted = matches!(error, Some(ScanError::Progress(_)));
    let mut error = error.map(AuditError::from);

    let catalog = match &effective.catalog {
        Some(path) => match SeverityCatalog::load(path) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                warn!(error = %e, "Scoring skipped");
                error.get_or_insert(e.into());
                None
            }
        },
        None => {
            debug!("No severity catalog configured, scoring skipped");
            None
        }
    };

    let names = registry.names();
    let mut report = ScanReport::new(&names, &results, catalog.as_ref()).with_aborted(aborted);

    if let Some(catalog) = &catalog {
        report = report.with_score(&resolve(catalog, &results));

        if !effective.no_game && !aborted {
            match update_game_state(&results, catalog, store) {
                Ok(game) => report = report.with_game(game),
                Err(e) => {
                    error.get_or_insert(e.into());
                }
            }
        }
    }

    AuditOutcome { report, error }
}

fn settings_store(effective: &EffectiveConfig) -> Box<dyn SettingsStore> {
    let path = match &effective.settings {
        Some(path) => Ok(path.clone()),
        None => FileSettingsStore::default_path(),
    };
    match path {
        Ok(path) => Box::new(FileSettingsStore::new(path)),
        Err(e) => {
            warn!(error = %e, "Game state will not be persisted");
            Box::new(MemorySettingsStore::default())
        }
    }
}

pub fn format_report(effective: &EffectiveConfig, report: &ScanReport) -> String {
    match effective.format {
        OutputFormat::Terminal => TerminalReporter::new(effective.verbose).report(report),
        OutputFormat::Json => JsonReporter::new().report(report),
    }
}

/// Run normal scan mode.
pub fn run_normal_mode(cli: &Cli) -> ExitCode {
    let cwd = std::env::current_dir().ok();
    let config = Config::load(cwd.as_deref());
    let effective = EffectiveConfig::from_cli_and_config(cli, &config);

    if cli.list {
        let registry = CheckRegistry::standard(&HostAdapters::system());
        return super::handle_list(&registry, &effective.disabled_probes);
    }

    let registry =
        CheckRegistry::standard(&HostAdapters::system()).without(&effective.disabled_probes);
    let store = settings_store(&effective);

    info!(checks = registry.len(), "Starting scan");
    let outcome = {
        let mut progress = TerminalProgress::new(std::io::stderr().is_terminal(), effective.ci);
        run_audit(&effective, &registry, &mut progress, store.as_ref())
    };

    let output = format_report(&effective, &outcome.report);

    if let Some(ref output_path) = effective.output {
        match fs::write(output_path, &output) {
            Ok(()) => {
                println!("Output written to {}", output_path.display());
            }
            Err(e) => {
                let err = AuditError::WriteOutput {
                    path: output_path.clone(),
                    source: e,
                };
                eprintln!("{}", err);
                return ExitCode::from(2);
            }
        }
    } else {
        println!("{}", output);
    }

    if let Some(ref e) = outcome.error {
        eprintln!("{}", e);
    }

    debug!(
        checks = outcome.report.checks.len(),
        failed = outcome.report.failed_count(),
        "Scan finished"
    );
    ExitCode::from(outcome.exit_status())
}
