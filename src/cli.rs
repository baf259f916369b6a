use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "posture-audit",
    version,
    about = "Security and privacy posture scanner for workstations",
    long_about = "posture-audit runs a battery of host checks, scores them against a severity catalog and tracks a trust level across scans."
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// Severity catalog (JSON) used for scoring
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Settings file holding the game state
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// CI mode: non-interactive output
    #[arg(long)]
    pub ci: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip scoring and trust level tracking
    #[arg(long)]
    pub no_game: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// List the registered checks and exit
    #[arg(long)]
    pub list: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_no_args() {
        let cli = Cli::try_parse_from(["posture-audit"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Terminal);
        assert!(cli.catalog.is_none());
        assert!(!cli.ci);
        assert!(!cli.no_game);
        assert!(!cli.list);
    }

    #[test]
    fn test_parse_format_json() {
        let cli = Cli::try_parse_from(["posture-audit", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_paths() {
        let cli = Cli::try_parse_from([
            "posture-audit",
            "--catalog",
            "catalog.json",
            "--settings",
            "settings.json",
            "-o",
            "report.json",
        ])
        .unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("catalog.json")));
        assert_eq!(cli.settings, Some(PathBuf::from("settings.json")));
        assert_eq!(cli.output, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_parse_flags() {
        let cli =
            Cli::try_parse_from(["posture-audit", "--ci", "-v", "--no-game", "--list"]).unwrap();
        assert!(cli.ci);
        assert!(cli.verbose);
        assert!(cli.no_game);
        assert!(cli.list);
    }

    #[test]
    fn test_invalid_format() {
        assert!(Cli::try_parse_from(["posture-audit", "--format", "sarif"]).is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("terminal".parse::<OutputFormat>(), Ok(OutputFormat::Terminal));
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
