//! SMB server protocol versions.

use crate::adapters::command::output_lines;
use crate::adapters::{CommandExecutor, ProbeError};
use crate::check::{CheckResult, ids};

/// Outcome 0 when only SMB2 is served, 1 when the legacy SMB1 protocol is
/// enabled, 2 when neither is.
pub fn smb(smb1_executor: &dyn CommandExecutor, smb2_executor: &dyn CommandExecutor) -> CheckResult {
    let smb1 = match smb_enabled("SMB1", smb1_executor) {
        Ok(enabled) => enabled,
        Err(e) => return CheckResult::failed(ids::SMB, "error retrieving SMB1 status", e),
    };
    let smb2 = match smb_enabled("SMB2", smb2_executor) {
        Ok(enabled) => enabled,
        Err(e) => return CheckResult::failed(ids::SMB, "error retrieving SMB2 status", e),
    };

    let outcome = match (smb1, smb2) {
        (true, _) => 1,
        (false, true) => 0,
        (false, false) => 2,
    };
    CheckResult::new(ids::SMB, outcome, [status("SMB1", smb1), status("SMB2", smb2)])
}

fn status(version: &str, enabled: bool) -> String {
    if enabled {
        format!("{}: enabled", version)
    } else {
        format!("{}: not enabled", version)
    }
}

/// Reads `Enable<version>Protocol` from the SMB server configuration.
///
/// PowerShell prints a header, a dashed rule, then the value.
pub fn smb_enabled(version: &str, executor: &dyn CommandExecutor) -> Result<bool, ProbeError> {
    let command = format!(
        "Get-SmbServerConfiguration | Select-Object Enable{}Protocol",
        version
    );
    let output = executor.execute("powershell", &[&command])?;
    let lines = output_lines(&output);

    let value = lines
        .iter()
        .position(|l| l.trim_start().starts_with("---"))
        .and_then(|i| lines.get(i + 1))
        .map(|l| l.trim())
        .ok_or_else(|| ProbeError::UnexpectedOutput(format!("no {} value in output", version)))?;

    Ok(value == "True")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockCommandExecutor;

    fn table(column: &str, value: &str) -> String {
        format!(
            "\r\n{}\r\n{}\r\n{:>width$}\r\n\r\n",
            column,
            "-".repeat(column.len()),
            value,
            width = column.len()
        )
    }

    #[test]
    fn test_smb1_disabled_smb2_enabled() {
        let smb1 = MockCommandExecutor::with_output(table("EnableSMB1Protocol", "False"));
        let smb2 = MockCommandExecutor::with_output(table("EnableSMB2Protocol", "True"));
        let result = smb(&smb1, &smb2);
        assert_eq!(result.outcome_id(), 0);
        assert_eq!(result.details(), ["SMB1: not enabled", "SMB2: enabled"]);
    }

    #[test]
    fn test_smb1_enabled() {
        let smb1 = MockCommandExecutor::with_output(table("EnableSMB1Protocol", "True"));
        let smb2 = MockCommandExecutor::with_output(table("EnableSMB2Protocol", "True"));
        assert_eq!(smb(&smb1, &smb2).outcome_id(), 1);
    }

    #[test]
    fn test_both_disabled() {
        let smb1 = MockCommandExecutor::with_output(table("EnableSMB1Protocol", "False"));
        let smb2 = MockCommandExecutor::with_output(table("EnableSMB2Protocol", "False"));
        assert_eq!(smb(&smb1, &smb2).outcome_id(), 2);
    }

    #[test]
    fn test_garbled_output_fails() {
        let smb1 = MockCommandExecutor::with_output("Access denied");
        let smb2 = MockCommandExecutor::with_output(table("EnableSMB2Protocol", "True"));
        let result = smb(&smb1, &smb2);
        assert!(result.is_failure());
    }

    #[test]
    fn test_command_invocation() {
        let executor = MockCommandExecutor::with_output(table("EnableSMB2Protocol", "True"));
        assert!(smb_enabled("SMB2", &executor).unwrap());
        assert_eq!(
            executor.calls(),
            vec!["powershell Get-SmbServerConfiguration | Select-Object EnableSMB2Protocol"]
        );
    }
}
