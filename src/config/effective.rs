//! CLI + config file merging.

use std::collections::HashSet;
use std::path::PathBuf;

use super::types::Config;
use crate::cli::{Cli, OutputFormat};

/// Options after merging the command line over the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub format: OutputFormat,
    pub ci: bool,
    pub verbose: bool,
    pub no_game: bool,
    pub catalog: Option<PathBuf>,
    pub settings: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub disabled_probes: HashSet<String>,
}

impl EffectiveConfig {
    /// Merge CLI options with config file settings.
    ///
    /// - Boolean flags: CLI OR config (either can enable)
    /// - Format: CLI when not the default, else config, else default
    /// - Paths: CLI takes precedence, fallback to config
    pub fn from_cli_and_config(cli: &Cli, config: &Config) -> Self {
        let format = if cli.format != OutputFormat::default() {
            cli.format
        } else {
            parse_output_format(config.scan.format.as_deref()).unwrap_or(cli.format)
        };

        Self {
            format,
            ci: cli.ci || config.scan.ci,
            verbose: cli.verbose || config.scan.verbose,
            no_game: cli.no_game || config.scan.no_game,
            catalog: cli.catalog.clone().or_else(|| config.catalog.clone()),
            settings: cli.settings.clone().or_else(|| config.settings.clone()),
            output: cli.output.clone(),
            disabled_probes: config.probes.disabled.clone(),
        }
    }
}

/// Parse output format from string using FromStr.
pub fn parse_output_format(s: Option<&str>) -> Option<OutputFormat> {
    s?.parse().ok()
}
