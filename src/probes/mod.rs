//! Concrete host probes.
//!
//! Every probe takes its adapters as arguments and returns exactly one
//! [`CheckResult`](crate::check::CheckResult). Adapter errors are folded into
//! the result; a probe never panics or returns `Err`.

pub mod firefox;
pub mod guest_account;
pub mod installed_software;
pub mod permission;
pub mod remote_desktop;
pub mod search_engine;
pub mod secure_boot;
pub mod smb;
pub mod uac;

pub use firefox::{adblocker_firefox, extensions_firefox};
pub use guest_account::guest_account;
pub use installed_software::installed_software;
pub use permission::{Permission, permission};
pub use remote_desktop::remote_desktop;
pub use search_engine::search_engine;
pub use secure_boot::secure_boot;
pub use smb::smb;
pub use uac::uac;
