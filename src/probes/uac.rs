//! User Account Control consent level.

use crate::adapters::CommandExecutor;
use crate::check::{CheckResult, ids};

const CONSENT_QUERY: &str = r"(Get-ItemProperty -Path 'HKLM:\SOFTWARE\Microsoft\Windows\CurrentVersion\Policies\System').ConsentPromptBehaviorAdmin";

/// Reads `ConsentPromptBehaviorAdmin` through PowerShell.
///
/// Outcomes: 0 disabled, 1 prompts for apps and settings changes, 2 prompts for
/// apps only, 3 any other level.
pub fn uac(executor: &dyn CommandExecutor) -> CheckResult {
    let output = match executor.execute("powershell", &[CONSENT_QUERY]) {
        Ok(out) => out,
        Err(e) => return CheckResult::failed(ids::UAC, "error retrieving UAC", e),
    };

    match output.trim() {
        "0" => CheckResult::new(ids::UAC, 0, ["UAC is disabled."]),
        "2" => CheckResult::new(
            ids::UAC,
            1,
            ["UAC is turned on for apps making changes to your computer and for changing your settings."],
        ),
        "5" => CheckResult::new(
            ids::UAC,
            2,
            ["UAC is turned on for apps making changes to your computer."],
        ),
        _ => CheckResult::new(ids::UAC, 3, ["Unknown UAC level"]),
    }
}
