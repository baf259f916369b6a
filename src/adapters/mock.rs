//! Test doubles for the probe adapters.

use super::ProbeError;
use super::command::CommandExecutor;
use super::profile::{ChromiumBrowser, ProfileFinder, UsernameRetriever};
use super::registry::RegistryKey;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Response {
    Output(String),
    Status(String, i32),
    Missing(String),
}

impl Response {
    fn to_result(&self) -> Result<String, ProbeError> {
        match self {
            Response::Output(out) => Ok(out.clone()),
            Response::Status(program, code) => Err(ProbeError::CommandStatus {
                program: program.clone(),
                code: *code,
                stderr: "mock failure".to_string(),
            }),
            Response::Missing(program) => Err(ProbeError::Command {
                program: program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock: not found"),
            }),
        }
    }
}

/// Command executor returning canned responses.
///
/// Responses are consumed in order; the last one repeats once the queue is
/// down to a single entry. Every invocation is recorded as `"program arg..."`.
#[derive(Debug, Default)]
pub struct MockCommandExecutor {
    responses: Mutex<VecDeque<Response>>,
    calls: Mutex<Vec<String>>,
}

impl MockCommandExecutor {
    pub fn with_output(output: impl Into<String>) -> Self {
        Self::from_responses(vec![Response::Output(output.into())])
    }

    /// Outputs returned one per call, in order.
    pub fn with_outputs<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_responses(
            outputs
                .into_iter()
                .map(|o| Response::Output(o.into()))
                .collect(),
        )
    }

    /// The program runs but exits unsuccessfully.
    pub fn with_status_error(program: &str, code: i32) -> Self {
        Self::from_responses(vec![Response::Status(program.to_string(), code)])
    }

    /// The program cannot be spawned.
    pub fn with_missing_program(program: &str) -> Self {
        Self::from_responses(vec![Response::Missing(program.to_string())])
    }

    fn from_responses(responses: Vec<Response>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CommandExecutor for MockCommandExecutor {
    fn execute(&self, program: &str, args: &[&str]) -> Result<String, ProbeError> {
        if let Ok(mut calls) = self.calls.lock() {
            let mut line = program.to_string();
            for arg in args {
                line.push(' ');
                line.push_str(arg);
            }
            calls.push(line);
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| ProbeError::UnexpectedOutput("mock poisoned".to_string()))?;
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        match response {
            Some(r) => r.to_result(),
            None => Ok(String::new()),
        }
    }
}

/// In-memory registry tree.
///
/// `open_key` matches a direct child by its full `name`, so a test can hang a
/// deep path such as `SYSTEM\CurrentControlSet\Control\SecureBoot\State` off
/// the root as a single child.
#[derive(Debug, Clone, Default)]
pub struct MockRegistryKey {
    pub name: String,
    pub string_values: HashMap<String, String>,
    pub integer_values: HashMap<String, u64>,
    pub subkeys: Vec<MockRegistryKey>,
}

impl MockRegistryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_string(mut self, name: &str, value: &str) -> Self {
        self.string_values
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_integer(mut self, name: &str, value: u64) -> Self {
        self.integer_values.insert(name.to_string(), value);
        self
    }

    pub fn with_subkey(mut self, key: MockRegistryKey) -> Self {
        self.subkeys.push(key);
        self
    }
}

impl RegistryKey for MockRegistryKey {
    fn path(&self) -> &str {
        &self.name
    }

    fn open_key(&self, path: &str) -> Result<Box<dyn RegistryKey>, ProbeError> {
        self.subkeys
            .iter()
            .find(|k| k.name == path)
            .map(|k| Box::new(k.clone()) as Box<dyn RegistryKey>)
            .ok_or_else(|| ProbeError::KeyNotFound(path.to_string()))
    }

    fn string_value(&self, name: &str) -> Result<String, ProbeError> {
        self.string_values
            .get(name)
            .cloned()
            .ok_or_else(|| ProbeError::ValueNotFound {
                key: self.name.clone(),
                name: name.to_string(),
            })
    }

    fn integer_value(&self, name: &str) -> Result<u64, ProbeError> {
        self.integer_values
            .get(name)
            .copied()
            .ok_or_else(|| ProbeError::ValueNotFound {
                key: self.name.clone(),
                name: name.to_string(),
            })
    }

    fn subkey_names(&self) -> Result<Vec<String>, ProbeError> {
        Ok(self.subkeys.iter().map(|k| k.name.clone()).collect())
    }
}

/// Profile finder returning a fixed list, or failing when empty.
///
/// Chromium preferences resolve below `chromium_root` when it is set.
#[derive(Debug, Clone, Default)]
pub struct MockProfileFinder {
    pub profiles: Vec<PathBuf>,
    pub chromium_root: Option<PathBuf>,
}

impl ProfileFinder for MockProfileFinder {
    fn firefox_profiles(&self) -> Result<Vec<PathBuf>, ProbeError> {
        if self.profiles.is_empty() {
            return Err(ProbeError::Io {
                path: PathBuf::from("Mozilla/Firefox/Profiles"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no profiles"),
            });
        }
        Ok(self.profiles.clone())
    }

    fn chromium_preferences(&self, browser: ChromiumBrowser) -> Result<PathBuf, ProbeError> {
        match &self.chromium_root {
            Some(root) => Ok(root.join(browser.preferences_path())),
            None => Err(ProbeError::Io {
                path: browser.preferences_path(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no browser"),
            }),
        }
    }
}

/// Username retriever returning a fixed name, or failing when `None`.
#[derive(Debug, Clone, Default)]
pub struct MockUsernameRetriever {
    pub username: Option<String>,
}

impl UsernameRetriever for MockUsernameRetriever {
    fn current_username(&self) -> Result<String, ProbeError> {
        self.username
            .clone()
            .ok_or_else(|| ProbeError::UnexpectedOutput("no current user".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_consumed_in_order_then_repeat() {
        let mock = MockCommandExecutor::with_outputs(["one", "two"]);
        assert_eq!(mock.execute("a", &[]).unwrap(), "one");
        assert_eq!(mock.execute("b", &["x"]).unwrap(), "two");
        assert_eq!(mock.execute("c", &[]).unwrap(), "two");
        assert_eq!(mock.calls(), vec!["a", "b x", "c"]);
    }

    #[test]
    fn test_mock_registry_open_by_full_name() {
        let root = MockRegistryKey::default()
            .with_subkey(MockRegistryKey::new(r"A\B").with_integer("Flag", 1));
        let key = root.open_key(r"A\B").unwrap();
        assert_eq!(key.integer_value("Flag").unwrap(), 1);
        assert!(root.open_key("A").is_err());
        assert!(key.string_value("Flag").is_err());
    }
}
