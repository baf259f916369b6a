//! Remote Desktop availability.

use crate::adapters::RegistryKey;
use crate::check::{CheckResult, ids};

pub const TERMINAL_SERVER_KEY: &str = r"System\CurrentControlSet\Control\Terminal Server";

/// Outcome 0 when Remote Desktop connections are allowed, 1 when denied.
pub fn remote_desktop(local_machine: &dyn RegistryKey) -> CheckResult {
    let key = match local_machine.open_key(TERMINAL_SERVER_KEY) {
        Ok(key) => key,
        Err(e) => {
            return CheckResult::failed(ids::REMOTE_DESKTOP, "error opening registry key", e);
        }
    };

    match key.integer_value("fDenyTSConnections") {
        Ok(0) => CheckResult::new(ids::REMOTE_DESKTOP, 0, ["Remote Desktop is enabled"]),
        Ok(_) => CheckResult::new(ids::REMOTE_DESKTOP, 1, ["Remote Desktop is disabled"]),
        Err(e) => CheckResult::failed(
            ids::REMOTE_DESKTOP,
            "error reading fDenyTSConnections",
            e,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockRegistryKey;

    fn machine(deny: Option<u64>) -> MockRegistryKey {
        let mut key = MockRegistryKey::new(TERMINAL_SERVER_KEY);
        if let Some(v) = deny {
            key = key.with_integer("fDenyTSConnections", v);
        }
        MockRegistryKey::default().with_subkey(key)
    }

    #[test]
    fn test_remote_desktop_enabled() {
        let result = remote_desktop(&machine(Some(0)));
        assert_eq!(result.outcome_id(), 0);
        assert_eq!(result.details(), ["Remote Desktop is enabled"]);
    }

    #[test]
    fn test_remote_desktop_disabled() {
        assert_eq!(remote_desktop(&machine(Some(1))).outcome_id(), 1);
    }

    #[test]
    fn test_remote_desktop_missing_value() {
        let result = remote_desktop(&machine(None));
        assert!(result.is_failure());
    }

    #[test]
    fn test_remote_desktop_missing_key() {
        let result = remote_desktop(&MockRegistryKey::default());
        assert!(result.is_failure());
        assert!(
            result
                .failure()
                .unwrap()
                .message()
                .contains("error opening registry key")
        );
    }
}
