//! UEFI Secure Boot state.

use crate::adapters::RegistryKey;
use crate::check::{CheckResult, ids};

pub const SECURE_BOOT_KEY: &str = r"SYSTEM\CurrentControlSet\Control\SecureBoot\State";

/// Outcome 1 enabled, 0 disabled, 2 when the firmware reports anything else.
pub fn secure_boot(local_machine: &dyn RegistryKey) -> CheckResult {
    let key = match local_machine.open_key(SECURE_BOOT_KEY) {
        Ok(key) => key,
        Err(e) => return CheckResult::failed(ids::SECURE_BOOT, "error opening registry key", e),
    };

    match key.integer_value("UEFISecureBootEnabled") {
        Ok(1) => CheckResult::outcome(ids::SECURE_BOOT, 1),
        Ok(0) => CheckResult::outcome(ids::SECURE_BOOT, 0),
        Ok(_) => CheckResult::outcome(ids::SECURE_BOOT, 2),
        Err(e) => CheckResult::failed(ids::SECURE_BOOT, "error reading UEFISecureBootEnabled", e),
    }
}
