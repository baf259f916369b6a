//! `--list` handler.

use crate::scan::CheckRegistry;
use colored::Colorize;
use std::collections::HashSet;
use std::process::ExitCode;

/// One line per registered probe: position, name and whether config disables it.
pub fn format_registry(registry: &CheckRegistry, disabled: &HashSet<String>) -> String {
    let mut output = String::new();
    for (index, name) in registry.names().into_iter().enumerate() {
        let marker = if disabled.contains(name) {
            format!(" {}", "(disabled)".dimmed())
        } else {
            String::new()
        };
        output.push_str(&format!("{:>3}  {}{}\n", index + 1, name, marker));
    }
    output
}

pub fn handle_list(registry: &CheckRegistry, disabled: &HashSet<String>) -> ExitCode {
    print!("{}", format_registry(registry, disabled));
    ExitCode::SUCCESS
}
