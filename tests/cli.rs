use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CHECK_COUNT: usize = 15;

/// Command running inside `dir`, so no stray project config is picked up.
fn cmd(dir: &Path) -> assert_cmd::Command {
    let mut c = cargo_bin_cmd!("posture-audit");
    c.current_dir(dir).env_remove("RUST_LOG");
    c
}

fn write_catalog(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("catalog.json");
    fs::write(
        &path,
        r#"{"13": {"0": {"Severity": 3, "Name": "UAC is disabled"}}, "11": {"0": {"Severity": 2}}}"#,
    )
    .unwrap();
    path
}

mod listing {
    use super::*;

    #[test]
    fn test_list_prints_registry() {
        let dir = TempDir::new().unwrap();
        cmd(dir.path())
            .arg("--list")
            .assert()
            .success()
            .stdout(predicate::str::contains("permission_location"))
            .stdout(predicate::str::contains("adblock_firefox"))
            .stdout(predicate::str::contains("(disabled)").not());
    }

    #[test]
    fn test_list_marks_disabled_probes() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".posture-audit.yaml"),
            "probes:\n  disabled:\n    - smb\n",
        )
        .unwrap();

        cmd(dir.path())
            .arg("--list")
            .assert()
            .success()
            .stdout(predicate::str::contains("(disabled)"));
    }

    #[test]
    fn test_help() {
        let dir = TempDir::new().unwrap();
        cmd(dir.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("posture"));
    }

    #[test]
    fn test_invalid_format_is_usage_error() {
        let dir = TempDir::new().unwrap();
        cmd(dir.path())
            .args(["--format", "sarif"])
            .assert()
            .failure()
            .code(2);
    }
}

mod scanning {
    use super::*;

    #[test]
    fn test_json_scan_without_game() {
        let dir = TempDir::new().unwrap();
        let output = cmd(dir.path())
            .args(["--format", "json", "--ci", "--no-game"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["aborted"], false);
        assert_eq!(parsed["checks"].as_array().unwrap().len(), CHECK_COUNT);
        assert_eq!(parsed["checks"][0]["name"], "permission_location");
        assert!(parsed.get("game").is_none());
    }

    #[test]
    fn test_disabled_probe_is_not_run() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".posture-audit.json"),
            r#"{"probes": {"disabled": ["smb", "uac"]}}"#,
        )
        .unwrap();

        let output = cmd(dir.path())
            .args(["--format", "json", "--ci", "--no-game"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let names: Vec<&str> = parsed["checks"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|c| c["name"].as_str())
            .collect();
        assert_eq!(names.len(), CHECK_COUNT - 2);
        assert!(!names.contains(&"smb"));
        assert!(!names.contains(&"uac"));
    }

    #[test]
    fn test_missing_catalog_is_fatal() {
        let dir = TempDir::new().unwrap();
        cmd(dir.path())
            .args(["--format", "json", "--ci", "--catalog"])
            .arg(dir.path().join("missing.json"))
            .arg("--settings")
            .arg(dir.path().join("settings.json"))
            .assert()
            .failure()
            .code(2)
            .stdout(predicate::str::contains("\"checks\""))
            .stderr(predicate::str::contains("Severity catalog error"));

        assert!(!dir.path().join("settings.json").exists());
    }

    #[test]
    fn test_game_state_is_persisted() {
        let dir = TempDir::new().unwrap();
        let catalog = write_catalog(dir.path());
        let settings = dir.path().join("state").join("settings.json");

        for _ in 0..2 {
            cmd(dir.path())
                .args(["--format", "json", "--ci", "--catalog"])
                .arg(&catalog)
                .arg("--settings")
                .arg(&settings)
                .assert()
                .success()
                .stdout(predicate::str::contains("\"trust_level\""));
        }

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&settings).unwrap()).unwrap();
        assert_eq!(saved["points_history"].as_array().unwrap().len(), 2);
        assert_eq!(saved["timestamps"].as_array().unwrap().len(), 2);
        assert_eq!(saved["lighthouse_state"], 1);
    }

    #[test]
    fn test_output_file() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("report.json");
        cmd(dir.path())
            .args(["--format", "json", "--ci", "--no-game", "--output"])
            .arg(&report)
            .assert()
            .success()
            .stdout(predicate::str::contains("Output written to"));

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(parsed["checks"].as_array().unwrap().len(), CHECK_COUNT);
    }

    #[test]
    fn test_output_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        cmd(dir.path())
            .args(["--ci", "--no-game", "--output"])
            .arg(dir.path().join("no-such-dir").join("report.txt"))
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("Failed to write output"));
    }

    #[test]
    fn test_terminal_report() {
        let dir = TempDir::new().unwrap();
        cmd(dir.path())
            .args(["--ci", "--no-game"])
            .assert()
            .success()
            .stdout(predicate::str::contains("posture-audit v"))
            .stdout(predicate::str::contains("Checks:"));
    }
}
