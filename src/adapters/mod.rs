//! Side-effect seams for probes.
//!
//! Probes never touch the OS directly. They receive one of these adapters at
//! registration time, which keeps every probe testable with the doubles in
//! [`mock`].

pub mod command;
pub mod mock;
pub mod profile;
pub mod registry;

pub use command::{CommandExecutor, SystemCommandExecutor};
pub use profile::{
    ChromiumBrowser, DataDirProfileFinder, EnvUsernameRetriever, ProfileFinder, UsernameRetriever,
};
pub use registry::{Hive, RegQueryKey, RegistryKey};

use std::path::PathBuf;
use thiserror::Error;

/// Failure inside a probe adapter.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to run {program}: {source}")]
    Command {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {code}: {stderr}")]
    CommandStatus {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("registry key not found: {0}")]
    KeyNotFound(String),

    #[error("registry value {name} not found under {key}")]
    ValueNotFound { key: String, name: String },

    #[error("unexpected output: {0}")]
    UnexpectedOutput(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
