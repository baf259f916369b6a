//! Apps granted access to privacy-sensitive capabilities.

use crate::adapters::{ProbeError, RegistryKey};
use crate::check::{CheckResult, ProbeId, ids};

const CONSENT_STORE: &str =
    r"Software\Microsoft\Windows\CurrentVersion\CapabilityAccessManager\ConsentStore";
const NON_PACKAGED: &str = "NonPackaged";

/// Capability recorded in the consent store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Location,
    Microphone,
    Webcam,
    Appointments,
    Contacts,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::Location,
        Permission::Microphone,
        Permission::Webcam,
        Permission::Appointments,
        Permission::Contacts,
    ];

    pub fn probe_id(&self) -> ProbeId {
        match self {
            Permission::Location => ids::LOCATION,
            Permission::Microphone => ids::MICROPHONE,
            Permission::Webcam => ids::WEBCAM,
            Permission::Appointments => ids::APPOINTMENTS,
            Permission::Contacts => ids::CONTACTS,
        }
    }

    /// Consent store subkey name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Location => "location",
            Permission::Microphone => "microphone",
            Permission::Webcam => "webcam",
            Permission::Appointments => "appointments",
            Permission::Contacts => "contacts",
        }
    }

    pub fn key_path(&self) -> String {
        format!(r"{}\{}", CONSENT_STORE, self.as_str())
    }
}

/// Lists the apps allowed to use `permission`.
///
/// Outcome 0 with the app names as details, or 1 when no app has access.
pub fn permission(permission: Permission, current_user: &dyn RegistryKey) -> CheckResult {
    let probe_id = permission.probe_id();
    match allowed_apps(permission, current_user) {
        Ok(apps) if apps.is_empty() => CheckResult::outcome(probe_id, 1),
        Ok(apps) => CheckResult::new(probe_id, 0, apps),
        Err(e) => CheckResult::failed(
            probe_id,
            &format!("error reading {} permissions", permission.as_str()),
            e,
        ),
    }
}

fn allowed_apps(
    permission: Permission,
    current_user: &dyn RegistryKey,
) -> Result<Vec<String>, ProbeError> {
    let key = current_user.open_key(&permission.key_path())?;
    let mut apps: Vec<String> = Vec::new();

    for app_name in key.subkey_names()? {
        let app_key = key.open_key(&app_name)?;

        if app_name == NON_PACKAGED {
            // Desktop apps live one level deeper, named by their mangled exe path.
            for exe_key_name in app_key.subkey_names()? {
                let exe_key = app_key.open_key(&exe_key_name)?;
                if exe_key.string_value("Value")? == "Allow" {
                    push_unique(&mut apps, non_packaged_name(&exe_key_name));
                }
            }
        } else if app_key.string_value("Value")? == "Allow" {
            push_unique(&mut apps, packaged_name(&app_name));
        }
    }

    Ok(apps)
}

/// `Microsoft.WindowsCamera_8wekyb3d8bbwe` -> `Microsoft WindowsCamera`.
fn packaged_name(key_name: &str) -> String {
    key_name
        .split('_')
        .next()
        .unwrap_or(key_name)
        .replace('.', " ")
}

/// `C:#Program Files#Zoom#bin#Zoom.exe` -> `Zoom.exe`.
fn non_packaged_name(key_name: &str) -> String {
    key_name.rsplit('#').next().unwrap_or(key_name).to_string()
}

fn push_unique(apps: &mut Vec<String>, name: String) {
    if !apps.contains(&name) {
        apps.push(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockRegistryKey;

    fn user_with(store: MockRegistryKey) -> MockRegistryKey {
        MockRegistryKey::default().with_subkey(store)
    }

    #[test]
    fn test_packaged_app_allowed() {
        let store = MockRegistryKey::new(Permission::Webcam.key_path())
            .with_subkey(MockRegistryKey::new("microsoft.webcam").with_string("Value", "Allow"))
            .with_subkey(
                MockRegistryKey::new("Contoso.Denied_abc").with_string("Value", "Deny"),
            );
        let result = permission(Permission::Webcam, &user_with(store));
        assert_eq!(result.probe_id(), ids::WEBCAM);
        assert_eq!(result.outcome_id(), 0);
        assert_eq!(result.details(), ["microsoft webcam"]);
    }

    #[test]
    fn test_non_packaged_apps_allowed() {
        let non_packaged = MockRegistryKey::new(NON_PACKAGED)
            .with_subkey(
                MockRegistryKey::new("C:#Program Files#Zoom#bin#Zoom.exe")
                    .with_string("Value", "Allow"),
            )
            .with_subkey(
                MockRegistryKey::new("C:#Tools#spy.exe").with_string("Value", "Deny"),
            );
        let store = MockRegistryKey::new(Permission::Microphone.key_path()).with_subkey(non_packaged);
        let result = permission(Permission::Microphone, &user_with(store));
        assert_eq!(result.outcome_id(), 0);
        assert_eq!(result.details(), ["Zoom.exe"]);
    }

    #[test]
    fn test_duplicates_removed_in_first_seen_order() {
        let store = MockRegistryKey::new(Permission::Location.key_path())
            .with_subkey(MockRegistryKey::new("Maps_1").with_string("Value", "Allow"))
            .with_subkey(MockRegistryKey::new("Weather_1").with_string("Value", "Allow"))
            .with_subkey(MockRegistryKey::new("Maps_2").with_string("Value", "Allow"));
        let result = permission(Permission::Location, &user_with(store));
        assert_eq!(result.details(), ["Maps", "Weather"]);
    }

    #[test]
    fn test_no_apps_allowed() {
        let store = MockRegistryKey::new(Permission::Contacts.key_path());
        let result = permission(Permission::Contacts, &user_with(store));
        assert_eq!(result.outcome_id(), 1);
        assert!(result.details().is_empty());
    }

    #[test]
    fn test_missing_value_is_failure() {
        let store = MockRegistryKey::new(Permission::Appointments.key_path())
            .with_subkey(MockRegistryKey::new("Calendar_1"));
        let result = permission(Permission::Appointments, &user_with(store));
        assert!(result.is_failure());
        assert!(
            result
                .failure()
                .unwrap()
                .message()
                .starts_with("error reading appointments permissions")
        );
    }

    #[test]
    fn test_every_permission_has_distinct_probe_id() {
        let mut ids: Vec<_> = Permission::ALL.iter().map(|p| p.probe_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), Permission::ALL.len());
    }
}
