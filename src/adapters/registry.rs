//! Windows registry access.
//!
//! The production implementation shells out to `reg query` and parses its
//! listing, so the crate carries no platform-specific bindings.

use super::ProbeError;
use super::command::{CommandExecutor, output_lines};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::trace;

/// Read-only view of one registry key.
pub trait RegistryKey: Send + Sync {
    /// Full path of this key, e.g. `HKLM\SYSTEM\Setup`.
    fn path(&self) -> &str;

    /// Open a subkey relative to this key.
    fn open_key(&self, path: &str) -> Result<Box<dyn RegistryKey>, ProbeError>;

    fn string_value(&self, name: &str) -> Result<String, ProbeError>;

    fn integer_value(&self, name: &str) -> Result<u64, ProbeError>;

    /// Names of the direct subkeys, in listing order.
    fn subkey_names(&self) -> Result<Vec<String>, ProbeError>;
}

/// Registry root a probe reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hive {
    LocalMachine,
    CurrentUser,
}

impl Hive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hive::LocalMachine => "HKLM",
            Hive::CurrentUser => "HKCU",
        }
    }
}

static VALUE_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^ {4}(.+?) {4}(REG_[A-Z0-9_]+)(?: {4}(.*))?$").ok());

#[derive(Debug, Clone, PartialEq, Eq)]
struct RegValue {
    kind: String,
    data: String,
}

#[derive(Debug, Clone, Default)]
struct Listing {
    values: HashMap<String, RegValue>,
    subkeys: Vec<String>,
}

impl Listing {
    /// Parse the output of `reg query <key>` (non-recursive).
    fn parse(output: &str) -> Self {
        let mut listing = Listing::default();
        let mut header_seen = false;

        for line in output_lines(output) {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(caps) = VALUE_LINE.as_ref().and_then(|re| re.captures(line)) {
                listing.values.insert(
                    caps[1].to_string(),
                    RegValue {
                        kind: caps[2].to_string(),
                        data: caps.get(3).map_or("", |m| m.as_str()).trim().to_string(),
                    },
                );
            } else if line.starts_with("HKEY_") {
                // First key line echoes the queried key; the rest are subkeys.
                if header_seen {
                    if let Some(name) = line.rsplit('\\').next() {
                        listing.subkeys.push(name.to_string());
                    }
                } else {
                    header_seen = true;
                }
            }
        }

        listing
    }
}

/// Registry key backed by `reg query`.
pub struct RegQueryKey {
    executor: Arc<dyn CommandExecutor>,
    path: String,
    listing: Listing,
}

impl RegQueryKey {
    /// Root key of a hive. Values are read from opened subkeys.
    pub fn hive(hive: Hive, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            path: hive.as_str().to_string(),
            listing: Listing::default(),
        }
    }

    fn query(executor: Arc<dyn CommandExecutor>, path: String) -> Result<Self, ProbeError> {
        trace!(key = %path, "Querying registry key");
        let output = executor
            .execute("reg", &["query", &path])
            .map_err(|e| match e {
                ProbeError::CommandStatus { .. } => ProbeError::KeyNotFound(path.clone()),
                other => other,
            })?;
        let listing = Listing::parse(&output);
        Ok(Self {
            executor,
            path,
            listing,
        })
    }

    fn value(&self, name: &str) -> Result<&RegValue, ProbeError> {
        self.listing
            .values
            .get(name)
            .ok_or_else(|| ProbeError::ValueNotFound {
                key: self.path.clone(),
                name: name.to_string(),
            })
    }
}

impl RegistryKey for RegQueryKey {
    fn path(&self) -> &str {
        &self.path
    }

    fn open_key(&self, path: &str) -> Result<Box<dyn RegistryKey>, ProbeError> {
        let full = format!("{}\\{}", self.path, path.trim_matches('\\'));
        Ok(Box::new(Self::query(Arc::clone(&self.executor), full)?))
    }

    fn string_value(&self, name: &str) -> Result<String, ProbeError> {
        Ok(self.value(name)?.data.clone())
    }

    fn integer_value(&self, name: &str) -> Result<u64, ProbeError> {
        let value = self.value(name)?;
        match value.kind.as_str() {
            "REG_DWORD" | "REG_QWORD" => {
                let digits = value.data.trim_start_matches("0x");
                u64::from_str_radix(digits, 16).map_err(|_| {
                    ProbeError::UnexpectedOutput(format!("{} = {}", name, value.data))
                })
            }
            other => Err(ProbeError::UnexpectedOutput(format!(
                "{} is {}, not an integer",
                name, other
            ))),
        }
    }

    fn subkey_names(&self) -> Result<Vec<String>, ProbeError> {
        Ok(self.listing.subkeys.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockCommandExecutor;

    const TERMINAL_SERVER: &str = concat!(
        "\r\n",
        "HKEY_LOCAL_MACHINE\\System\\CurrentControlSet\\Control\\Terminal Server\r\n",
        "    AllowRemoteRPC    REG_DWORD    0x0\r\n",
        "    fDenyTSConnections    REG_DWORD    0x1\r\n",
        "    ProductName    REG_SZ    Windows 11 Pro\r\n",
        "    Empty Value    REG_SZ    \r\n",
        "\r\n",
        "HKEY_LOCAL_MACHINE\\System\\CurrentControlSet\\Control\\Terminal Server\\AddIns\r\n",
        "HKEY_LOCAL_MACHINE\\System\\CurrentControlSet\\Control\\Terminal Server\\WinStations\r\n",
    );

    #[test]
    fn test_parse_listing() {
        let listing = Listing::parse(TERMINAL_SERVER);
        assert_eq!(listing.values.len(), 4);
        assert_eq!(listing.values["ProductName"].data, "Windows 11 Pro");
        assert_eq!(listing.values["Empty Value"].data, "");
        assert_eq!(listing.subkeys, vec!["AddIns", "WinStations"]);
    }

    #[test]
    fn test_open_and_read_values() {
        let executor = Arc::new(MockCommandExecutor::with_output(TERMINAL_SERVER));
        let root = RegQueryKey::hive(Hive::LocalMachine, executor.clone());
        let key = root
            .open_key(r"System\CurrentControlSet\Control\Terminal Server")
            .unwrap();

        assert_eq!(
            key.path(),
            r"HKLM\System\CurrentControlSet\Control\Terminal Server"
        );
        assert_eq!(key.integer_value("fDenyTSConnections").unwrap(), 1);
        assert_eq!(key.string_value("ProductName").unwrap(), "Windows 11 Pro");
        assert!(matches!(
            key.integer_value("ProductName"),
            Err(ProbeError::UnexpectedOutput(_))
        ));
        assert!(matches!(
            key.string_value("Missing"),
            Err(ProbeError::ValueNotFound { .. })
        ));

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            r"reg query HKLM\System\CurrentControlSet\Control\Terminal Server"
        );
    }

    #[test]
    fn test_failed_query_is_key_not_found() {
        let executor = Arc::new(MockCommandExecutor::with_status_error("reg", 1));
        let root = RegQueryKey::hive(Hive::CurrentUser, executor);
        let err = root.open_key(r"Software\Nope").err().unwrap();
        assert!(matches!(err, ProbeError::KeyNotFound(ref p) if p == r"HKCU\Software\Nope"));
    }
}
