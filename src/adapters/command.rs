//! External command execution.

use super::ProbeError;
use std::process::Command;
use tracing::trace;

/// Runs an external program and returns its standard output.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, program: &str, args: &[&str]) -> Result<String, ProbeError>;
}

/// Executes commands on the host through `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, program: &str, args: &[&str]) -> Result<String, ProbeError> {
        trace!(program, ?args, "Executing command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| ProbeError::Command {
                program: program.to_string(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ProbeError::CommandStatus {
                program: program.to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Splits command output into lines, accepting both CRLF and LF endings.
pub fn output_lines(output: &str) -> Vec<&str> {
    output.lines().map(|l| l.trim_end_matches('\r')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_command_error() {
        let err = SystemCommandExecutor
            .execute("posture-audit-no-such-program", &[])
            .unwrap_err();
        assert!(matches!(err, ProbeError::Command { .. }));
        assert!(err.to_string().contains("posture-audit-no-such-program"));
    }

    #[test]
    fn test_output_lines_handles_crlf() {
        let lines = output_lines("a\r\nb\r\n\r\nc");
        assert_eq!(lines, vec!["a", "b", "", "c"]);
    }
}
