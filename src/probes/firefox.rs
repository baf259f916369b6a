//! Firefox add-ons and ad-blocking.

use crate::adapters::{ProbeError, ProfileFinder};
use crate::check::{CheckResult, ids};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const KNOWN_ADBLOCKERS: &[&str] = &[
    "adblocker ultimate",
    "adguard adblocker",
    "adblocker for youtube",
    "ublock origin",
    "adblock plus",
    "adblock for firefox",
];

#[derive(Debug, Deserialize)]
struct ExtensionsFile {
    #[serde(default)]
    addons: Vec<Addon>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Addon {
    #[serde(default)]
    default_locale: Locale,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    active: bool,
}

#[derive(Debug, Default, Deserialize)]
struct Locale {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    creator: Option<String>,
}

/// Inspects `extensions.json` of the first Firefox profile.
///
/// Returns the extension inventory (always outcome 0, one
/// `name,type,creator,active` detail per add-on) and the ad-blocker check
/// (outcome 0 when a known ad-blocker is installed, 1 otherwise). Both fail
/// together when the profile cannot be read.
pub fn extensions_firefox(finder: &dyn ProfileFinder) -> (CheckResult, CheckResult) {
    match read_addons(finder) {
        Ok(addons) => {
            let details: Vec<String> = addons
                .iter()
                .map(|a| {
                    format!(
                        "{},{},{},{}",
                        a.default_locale.name.as_deref().unwrap_or_default(),
                        a.kind,
                        a.default_locale.creator.as_deref().unwrap_or_default(),
                        a.active
                    )
                })
                .collect();
            let has_adblocker = addons
                .iter()
                .filter_map(|a| a.default_locale.name.as_deref())
                .any(is_adblocker);

            (
                CheckResult::new(ids::EXTENSIONS_FIREFOX, 0, details),
                CheckResult::outcome(ids::ADBLOCK_FIREFOX, if has_adblocker { 0 } else { 1 }),
            )
        }
        Err((context, e)) => {
            let message = e.to_string();
            (
                CheckResult::failed(ids::EXTENSIONS_FIREFOX, context, &message),
                CheckResult::failed(ids::ADBLOCK_FIREFOX, context, &message),
            )
        }
    }
}

/// The ad-blocker half of [`extensions_firefox`].
pub fn adblocker_firefox(finder: &dyn ProfileFinder) -> CheckResult {
    extensions_firefox(finder).1
}

fn read_addons(finder: &dyn ProfileFinder) -> Result<Vec<Addon>, (&'static str, ProbeError)> {
    let profiles = finder
        .firefox_profiles()
        .map_err(|e| ("no firefox directory found", e))?;
    let profile = profiles.first().ok_or((
        "no firefox directory found",
        ProbeError::UnexpectedOutput("no Firefox profile found".to_string()),
    ))?;
    parse_extensions(&profile.join("extensions.json"))
        .map(|f| f.addons)
        .map_err(|e| ("error reading extensions", e))
}

fn parse_extensions(path: &Path) -> Result<ExtensionsFile, ProbeError> {
    let content = fs::read_to_string(path).map_err(|e| ProbeError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ProbeError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Whether an add-on name belongs to a known ad-blocker.
pub fn is_adblocker(extension_name: &str) -> bool {
    let name = extension_name.to_lowercase();
    KNOWN_ADBLOCKERS.iter().any(|known| name.contains(known))
}
