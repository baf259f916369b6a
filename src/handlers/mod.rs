//! CLI command handlers.
//!
//! Kept out of main.rs so the scan flow can be unit tested with mock probes
//! and an in-memory settings store.

mod list;
mod scan;

pub use list::{format_registry, handle_list};
pub use scan::{AuditOutcome, run_audit, run_normal_mode};
