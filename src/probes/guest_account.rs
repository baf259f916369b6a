//! Built-in Guest account activation.

use crate::adapters::command::output_lines;
use crate::adapters::{CommandExecutor, ProbeError, UsernameRetriever};
use crate::check::{CheckResult, ids};

/// Well-known SID of the local Guests group.
const GUESTS_SID: &str = "S-1-5-32-546";

/// Line of `net user` output holding "Account active".
const ACCOUNT_ACTIVE_LINE: usize = 5;

/// Executors for the four commands the probe runs, in order.
pub struct GuestAccountCommands<'a> {
    pub local_groups: &'a dyn CommandExecutor,
    pub group_members: &'a dyn CommandExecutor,
    pub current_user: &'a dyn CommandExecutor,
    pub guest_user: &'a dyn CommandExecutor,
}

impl<'a> GuestAccountCommands<'a> {
    /// Use one executor for every command.
    pub fn all(executor: &'a dyn CommandExecutor) -> Self {
        Self {
            local_groups: executor,
            group_members: executor,
            current_user: executor,
            guest_user: executor,
        }
    }
}

/// Outcome 0 when there is no guest account, 1 when it is active, 2 when it
/// exists but is inactive.
///
/// `net` output is localized, so the word for "Yes" is taken from the current
/// (necessarily active) user's own "Account active" line.
pub fn guest_account(
    commands: &GuestAccountCommands<'_>,
    username: &dyn UsernameRetriever,
) -> CheckResult {
    match guest_state(commands, username) {
        Ok(outcome) => CheckResult::outcome(ids::GUEST_ACCOUNT, outcome),
        Err((context, e)) => CheckResult::failed(ids::GUEST_ACCOUNT, context, e),
    }
}

fn guest_state(
    commands: &GuestAccountCommands<'_>,
    username: &dyn UsernameRetriever,
) -> Result<i32, (&'static str, ProbeError)> {
    let groups = commands
        .local_groups
        .execute("powershell", &["Get-WmiObject Win32_Group | Select-Object SID,Name"])
        .map_err(|e| ("error executing command Get-WmiObject", e))?;
    let Some(guest_group) = guest_group_name(&groups) else {
        return Ok(0);
    };

    let members = commands
        .group_members
        .execute("net", &["localgroup", &guest_group])
        .map_err(|e| ("error executing command net localgroup", e))?;
    let Some(guest_user) = first_member(&members) else {
        return Ok(0);
    };

    let current = username
        .current_username()
        .map_err(|e| ("error retrieving current username", e))?;
    let own = commands
        .current_user
        .execute("net", &["user", &current])
        .map_err(|e| ("error executing command net user", e))?;
    let yes_word = active_line(&own)
        .and_then(|l| l.split_whitespace().last())
        .map(str::to_string)
        .ok_or(("error parsing net user output", unexpected("no Account active line")))?;

    let guest = commands
        .guest_user
        .execute("net", &["user", &guest_user])
        .map_err(|e| ("error executing command net user", e))?;
    let guest_active = active_line(&guest)
        .ok_or(("error parsing net user output", unexpected("no Account active line")))?;

    if guest_active.contains(&yes_word) {
        Ok(1)
    } else {
        Ok(2)
    }
}

fn unexpected(message: &str) -> ProbeError {
    ProbeError::UnexpectedOutput(message.to_string())
}

/// Name of the group whose SID is the Guests SID, from `SID  Name` rows.
fn guest_group_name(output: &str) -> Option<String> {
    output_lines(output)
        .into_iter()
        .find_map(|line| line.split_once(GUESTS_SID).map(|(_, rest)| rest.trim().to_string()))
        .filter(|name| !name.is_empty())
}

/// First member listed below the dashed rule of `net localgroup`.
fn first_member(output: &str) -> Option<String> {
    let lines = output_lines(output);
    lines
        .iter()
        .position(|l| l.starts_with("-----"))
        .and_then(|i| lines.get(i + 1))
        .map(|l| l.trim().to_string())
        .filter(|name| !name.is_empty())
}

fn active_line(output: &str) -> Option<&str> {
    output_lines(output).get(ACCOUNT_ACTIVE_LINE).copied()
}
