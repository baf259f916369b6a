//! Stable probe identifiers.
//!
//! These are the keys of the severity catalog. Never renumber a probe; retire
//! the id instead.

use super::ProbeId;

pub const CONTACTS: ProbeId = 5;
pub const LOCATION: ProbeId = 6;
pub const MICROPHONE: ProbeId = 7;
pub const WEBCAM: ProbeId = 8;
pub const APPOINTMENTS: ProbeId = 9;
pub const GUEST_ACCOUNT: ProbeId = 10;
pub const REMOTE_DESKTOP: ProbeId = 11;
pub const SMB: ProbeId = 12;
pub const UAC: ProbeId = 13;
pub const SECURE_BOOT: ProbeId = 14;
pub const INSTALLED_SOFTWARE: ProbeId = 15;
pub const EXTENSIONS_FIREFOX: ProbeId = 20;
pub const ADBLOCK_FIREFOX: ProbeId = 21;
pub const SEARCH_ENGINE_CHROME: ProbeId = 30;
pub const SEARCH_ENGINE_EDGE: ProbeId = 31;
