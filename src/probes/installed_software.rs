//! Inventory of installed programs and their versions.
//!
//! Programs are collected from `winget list` and from both uninstall hives
//! (64-bit and `Wow6432Node`). The same program seen by several sources is
//! reported once, at its highest version.

use crate::adapters::{CommandExecutor, ProbeError, RegistryKey, command::output_lines};
use crate::check::{CheckResult, ids};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

const UNINSTALL_KEYS: [&str; 2] = [
    r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall",
    r"SOFTWARE\Wow6432Node\Microsoft\Windows\CurrentVersion\Uninstall",
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Program {
    name: String,
    version: String,
}

/// Lists installed programs as `"<name> | <version>"` details, sorted by name.
///
/// Outcome 0 whenever at least one source could be read. The check fails only
/// when every source fails.
pub fn installed_software(
    executor: &dyn CommandExecutor,
    local_machine: &dyn RegistryKey,
) -> CheckResult {
    let mut programs = Vec::new();
    let mut first_error = None;

    match winget_programs(executor) {
        Ok(found) => programs.extend(found),
        Err(e) => {
            debug!(error = %e, "winget inventory unavailable");
            first_error.get_or_insert(e);
        }
    }
    for key in UNINSTALL_KEYS {
        match uninstall_programs(local_machine, key) {
            Ok(found) => programs.extend(found),
            Err(e) => {
                debug!(key, error = %e, "Uninstall key unavailable");
                first_error.get_or_insert(e);
            }
        }
    }

    if programs.is_empty()
        && let Some(e) = first_error
    {
        return CheckResult::failed(ids::INSTALLED_SOFTWARE, "error listing installed programs", e);
    }

    let details: Vec<String> = deduplicate(programs)
        .into_iter()
        .map(|p| format!("{} | {}", p.name, p.version))
        .collect();
    CheckResult::new(ids::INSTALLED_SOFTWARE, 0, details)
}

fn winget_programs(executor: &dyn CommandExecutor) -> Result<Vec<Program>, ProbeError> {
    let output = executor.execute("winget", &["list", "--disable-interactivity"])?;
    parse_winget_list(&output)
}

/// Parse the fixed-width table printed by `winget list`.
///
/// Column offsets come from the header; anything before `Name` on the header
/// line is progress output and is ignored.
fn parse_winget_list(output: &str) -> Result<Vec<Program>, ProbeError> {
    let lines = output_lines(output);
    let (header_at, header) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| {
            let start = line.find("Name")?;
            let header = &line[start..];
            (header.contains("Id") && header.contains("Version")).then_some((i, header))
        })
        .ok_or_else(|| ProbeError::UnexpectedOutput("winget list has no header".to_string()))?;

    let column = |title: &str| {
        header
            .find(title)
            .map(|byte| header[..byte].chars().count())
    };
    let (Some(id_col), Some(version_col)) = (column("Id"), column("Version")) else {
        return Err(ProbeError::UnexpectedOutput(
            "winget list header is missing columns".to_string(),
        ));
    };
    let version_end = column("Available").or_else(|| column("Source"));

    let programs = lines
        .iter()
        .skip(header_at + 1)
        .filter(|line| !line.trim().is_empty() && !line.starts_with('-'))
        .map(|line| {
            let chars: Vec<char> = line.chars().collect();
            Program {
                name: slice(&chars, 0, Some(id_col)),
                version: slice(&chars, version_col, version_end),
            }
        })
        .collect();
    Ok(programs)
}

fn slice(chars: &[char], start: usize, end: Option<usize>) -> String {
    let end = end.unwrap_or(chars.len()).min(chars.len());
    if start >= end {
        return String::new();
    }
    chars[start..end].iter().collect::<String>().trim().to_string()
}

fn uninstall_programs(root: &dyn RegistryKey, path: &str) -> Result<Vec<Program>, ProbeError> {
    let uninstall = root.open_key(path)?;
    let mut programs = Vec::new();
    for name in uninstall.subkey_names()? {
        let Ok(entry) = uninstall.open_key(&name) else {
            continue;
        };
        if let (Ok(name), Ok(version)) = (
            entry.string_value("DisplayName"),
            entry.string_value("DisplayVersion"),
        ) {
            programs.push(Program { name, version });
        }
    }
    Ok(programs)
}

/// Lowercase and strip everything but letters, digits and whitespace.
fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Compare dotted versions numerically. Non-numeric parts count as 0.
fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |part: &str| -> u64 {
        let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().unwrap_or(0)
    };
    let a: Vec<u64> = a.split('.').map(parse).collect();
    let b: Vec<u64> = b.split('.').map(parse).collect();
    for i in 0..a.len().max(b.len()) {
        let ordering = a.get(i).unwrap_or(&0).cmp(b.get(i).unwrap_or(&0));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn deduplicate(programs: Vec<Program>) -> Vec<Program> {
    let mut unique: BTreeMap<String, Program> = BTreeMap::new();
    for program in programs {
        if program.name.is_empty() || program.version.is_empty() {
            continue;
        }
        if program.name.to_lowercase().contains("microsoft defender") {
            continue;
        }
        let key = normalize(&program.name);
        let newer = unique.get(&key).is_none_or(|existing| {
            compare_versions(&program.version, &existing.version) == Ordering::Greater
        });
        if newer {
            unique.insert(key, program);
        }
    }
    unique.into_values().collect()
}
