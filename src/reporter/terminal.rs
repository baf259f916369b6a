use crate::game::GameState;
use crate::reporter::{CheckReport, Reporter, ScanReport};
use crate::scoring::{ScoreBreakdown, SeverityTier};
use colored::Colorize;

pub struct TerminalReporter {
    verbose: bool,
}

impl TerminalReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn tier_label(&self, tier: Option<SeverityTier>) -> colored::ColoredString {
        let Some(tier) = tier else {
            return "[UNSCORED]".dimmed();
        };
        let label = format!("[{}]", tier);
        match tier {
            SeverityTier::High => label.red().bold(),
            SeverityTier::Medium => label.yellow().bold(),
            SeverityTier::Low => label.cyan(),
            SeverityTier::Acceptable => label.green(),
            SeverityTier::Info => label.white(),
        }
    }

    fn format_check(&self, check: &CheckReport) -> String {
        let mut output = String::new();

        if let Some(error) = &check.error {
            output.push_str(&format!(
                "{} {}: {}\n",
                "[?]".yellow(),
                check.name.bold(),
                "could not be determined".yellow()
            ));
            if self.verbose {
                output.push_str(&format!("    {} {}\n", "=".dimmed(), error.dimmed()));
            }
            return output;
        }

        let headline = check
            .issue
            .clone()
            .or_else(|| check.details.first().cloned())
            .unwrap_or_else(|| format!("outcome {}", check.outcome_id));
        output.push_str(&format!(
            "{} {}: {}\n",
            self.tier_label(check.tier),
            check.name.bold(),
            headline
        ));

        if self.verbose {
            for detail in &check.details {
                output.push_str(&format!("    {} {}\n", "-".dimmed(), detail));
            }
        }

        let needs_fix = check.tier.is_some_and(|t| {
            matches!(
                t,
                SeverityTier::Low | SeverityTier::Medium | SeverityTier::High
            )
        });
        if needs_fix {
            for step in &check.remediation {
                output.push_str(&format!(
                    "    {} {}\n",
                    "=".dimmed(),
                    format!("fix: {}", step).green()
                ));
            }
        }

        output
    }

    fn format_score(&self, score: &ScoreBreakdown) -> String {
        format!(
            "Score: {} point(s) ({} high, {} medium, {} low, {} acceptable, {} info)\n",
            score.points.to_string().bold(),
            score.high.to_string().red().bold(),
            score.medium.to_string().yellow().bold(),
            score.low.to_string().cyan(),
            score.acceptable.to_string().green(),
            score.info
        )
    }

    fn format_game(&self, game: &GameState) -> String {
        let level = game.trust_level.to_string();
        let level = match game.trust_level.get() {
            5 => level.green().bold(),
            3 | 4 => level.cyan().bold(),
            _ => level.yellow(),
        };
        format!(
            "Trust level: {} after {} scan(s)\n",
            level,
            game.history.len()
        )
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, report: &ScanReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            format!("posture-audit v{} - Host Posture Scanner", report.version).bold()
        ));
        output.push_str(&format!(
            "Scanned at: {}\n\n",
            report.scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if report.checks.is_empty() {
            output.push_str("No checks were run.\n");
        }
        for check in &report.checks {
            output.push_str(&self.format_check(check));
        }

        output.push_str(&format!("{}\n", "━".repeat(50)));

        let failed = report.failed_count();
        output.push_str(&format!(
            "Checks: {} run, {} could not be determined\n",
            report.checks.len(),
            if failed > 0 {
                failed.to_string().yellow().bold()
            } else {
                failed.to_string().normal()
            }
        ));

        if let Some(score) = &report.score {
            output.push_str(&self.format_score(score));
        }
        if let Some(game) = &report.game {
            output.push_str(&self.format_game(game));
        }

        if report.aborted {
            output.push_str(&format!(
                "Result: {} (exit code 1)\n",
                "ABORTED".red().bold()
            ));
        }

        output
    }
}
