//! Progress reporting during a scan.
//!
//! The orchestrator talks to a [`ProgressSink`]; a failing sink means the user
//! can no longer see the scan, and the scan stops.

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

/// A sink refused a progress update (for example, its window was closed).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Progress reporting failed: {0}")]
pub struct ProgressError(String);

impl ProgressError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Receives progress updates from the scan orchestrator.
pub trait ProgressSink {
    fn set_text(&mut self, text: &str) -> Result<(), ProgressError>;

    /// `percent` is in `0..=100`.
    fn set_percent(&mut self, percent: u8) -> Result<(), ProgressError>;
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn set_text(&mut self, _text: &str) -> Result<(), ProgressError> {
        Ok(())
    }

    fn set_percent(&mut self, _percent: u8) -> Result<(), ProgressError> {
        Ok(())
    }
}

/// Terminal progress bar, shown only in an interactive, non-CI terminal.
pub struct TerminalProgress {
    bar: Option<ProgressBar>,
}

impl TerminalProgress {
    pub fn new(is_tty: bool, is_ci: bool) -> Self {
        let bar = if should_show_progress(is_tty, is_ci) {
            Some(create_progress_bar())
        } else {
            None
        };

        Self { bar }
    }

    /// Finish and clear the progress bar.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ProgressSink for TerminalProgress {
    fn set_text(&mut self, text: &str) -> Result<(), ProgressError> {
        if let Some(bar) = &self.bar {
            bar.set_message(text.to_string());
        }
        Ok(())
    }

    fn set_percent(&mut self, percent: u8) -> Result<(), ProgressError> {
        if let Some(bar) = &self.bar {
            bar.set_position(u64::from(percent.min(100)));
        }
        Ok(())
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

fn should_show_progress(is_tty: bool, is_ci: bool) -> bool {
    is_tty && !is_ci
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    let style = ProgressStyle::with_template("{msg:<28} {bar:40} {pos:>3}% [{elapsed_precise}]")
        .map(|s| s.progress_chars("⣿⣀ "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
