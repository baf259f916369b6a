//! Configuration for posture-audit.
//!
//! ## Layers
//! - `types`: Configuration type definitions
//! - `loading`: File discovery and parsing
//! - `effective`: CLI + config merging

mod effective;
mod error;
mod loading;
mod types;

pub use effective::{EffectiveConfig, parse_output_format};
pub use error::{ConfigError, ConfigFormat};
pub use types::{Config, ProbesConfig, ScanConfig};
