//! Default search engine of Chromium-based browsers.

use crate::adapters::{ChromiumBrowser, ProbeError, ProfileFinder};
use crate::check::{CheckResult, ProbeId, ids};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Keyword Chromium reports when the user never picked an engine.
const BUILTIN_DEFAULT: &str = "google.com";

const WELL_KNOWN_ENGINES: &[&str] = &[
    "google.com",
    "bing.com",
    "duckduckgo.com",
    "ecosia.org",
    "startpage.com",
    "search.brave.com",
    "qwant.com",
    "yahoo.com",
];

fn probe_id(browser: ChromiumBrowser) -> ProbeId {
    match browser {
        ChromiumBrowser::Chrome => ids::SEARCH_ENGINE_CHROME,
        ChromiumBrowser::Edge => ids::SEARCH_ENGINE_EDGE,
    }
}

/// Reads the default search provider keyword from the browser's
/// `Preferences`.
///
/// Outcomes: 0 a well-known search engine, 1 any other keyword (a custom or
/// injected provider). The keyword is the only detail.
pub fn search_engine(browser: ChromiumBrowser, finder: &dyn ProfileFinder) -> CheckResult {
    let id = probe_id(browser);
    let preferences = match finder.chromium_preferences(browser) {
        Ok(path) => path,
        Err(e) => return CheckResult::failed(id, "no browser profile found", e),
    };

    let keyword = match read_keyword(&preferences) {
        Ok(keyword) => keyword,
        Err(e) => return CheckResult::failed(id, "error reading preferences", e),
    };

    let outcome = if is_well_known(&keyword) { 0 } else { 1 };
    CheckResult::new(id, outcome, [keyword])
}

fn read_keyword(path: &Path) -> Result<String, ProbeError> {
    let content = fs::read_to_string(path).map_err(|e| ProbeError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let preferences: Value = serde_json::from_str(&content).map_err(|e| ProbeError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    default_keyword(&preferences)
}

/// `default_search_provider_data.template_url_data.keyword`, or the built-in
/// default when the browser never stored a provider.
fn default_keyword(preferences: &Value) -> Result<String, ProbeError> {
    let Some(provider) = preferences.get("default_search_provider_data") else {
        return Ok(BUILTIN_DEFAULT.to_string());
    };
    provider
        .pointer("/template_url_data/keyword")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ProbeError::UnexpectedOutput("search provider has no keyword".to_string())
        })
}

fn is_well_known(keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    WELL_KNOWN_ENGINES
        .iter()
        .any(|engine| keyword == *engine || keyword.ends_with(&format!(".{}", engine)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockProfileFinder;
    use crate::check::UNDETERMINED;
    use tempfile::TempDir;

    fn browser_with(browser: ChromiumBrowser, preferences: &str) -> (TempDir, MockProfileFinder) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(browser.preferences_path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, preferences).unwrap();
        let finder = MockProfileFinder {
            chromium_root: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        (dir, finder)
    }

    #[test]
    fn test_well_known_engine() {
        let (_dir, finder) = browser_with(
            ChromiumBrowser::Chrome,
            r#"{"default_search_provider_data": {"template_url_data": {"keyword": "duckduckgo.com", "short_name": "DuckDuckGo"}}}"#,
        );
        let result = search_engine(ChromiumBrowser::Chrome, &finder);
        assert_eq!(result.probe_id(), ids::SEARCH_ENGINE_CHROME);
        assert_eq!(result.outcome_id(), 0);
        assert_eq!(result.details(), ["duckduckgo.com"]);
    }

    #[test]
    fn test_unknown_engine() {
        let (_dir, finder) = browser_with(
            ChromiumBrowser::Edge,
            r#"{"default_search_provider_data": {"template_url_data": {"keyword": "search-hijack.example"}}}"#,
        );
        let result = search_engine(ChromiumBrowser::Edge, &finder);
        assert_eq!(result.probe_id(), ids::SEARCH_ENGINE_EDGE);
        assert_eq!(result.outcome_id(), 1);
    }

    #[test]
    fn test_no_provider_means_builtin_default() {
        let (_dir, finder) = browser_with(ChromiumBrowser::Chrome, r#"{"browser": {}}"#);
        let result = search_engine(ChromiumBrowser::Chrome, &finder);
        assert_eq!(result.outcome_id(), 0);
        assert_eq!(result.details(), ["google.com"]);
    }

    #[test]
    fn test_provider_without_keyword_fails() {
        let (_dir, finder) = browser_with(
            ChromiumBrowser::Chrome,
            r#"{"default_search_provider_data": {"template_url_data": {}}}"#,
        );
        let result = search_engine(ChromiumBrowser::Chrome, &finder);
        assert_eq!(result.outcome_id(), UNDETERMINED);
        assert!(
            result
                .failure()
                .unwrap()
                .message()
                .starts_with("error reading preferences")
        );
    }

    #[test]
    fn test_browser_not_installed() {
        let dir = TempDir::new().unwrap();
        let finder = MockProfileFinder {
            chromium_root: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(search_engine(ChromiumBrowser::Edge, &finder).is_failure());
        assert!(search_engine(ChromiumBrowser::Edge, &MockProfileFinder::default()).is_failure());
    }

    #[test]
    fn test_subdomains_of_known_engines() {
        assert!(is_well_known("www.Google.com"));
        assert!(!is_well_known("notgoogle.com"));
    }
}
