//! Integration Test: Layering
//!
//! **Policy**: `voiceface-core` is headless. It must not depend on or
//! mention terminal UI crates, and production code in either crate must
//! propagate errors instead of unwrapping.

use std::fs;

use architectural_enforcement::{
    assert_no_violations, display_path, production_lines_of, rust_files, workspace_root,
    PRODUCTION_DIRS,
};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
        .expect("core manifest readable");

    let violations: Vec<String> = manifest
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter(|line| UI_CRATES.iter().any(|krate| line.contains(krate)))
        .map(|line| format!("conductor/core/Cargo.toml - {}", line.trim()))
        .collect();

    assert_no_violations("Core must not depend on UI crates", &violations);
}

#[test]
fn test_core_sources_do_not_use_ui_crates() {
    let mut violations = Vec::new();

    for path in rust_files("conductor/core/src") {
        for line in production_lines_of(&path) {
            if UI_CRATES.iter().any(|krate| line.code.contains(krate)) {
                violations.push(format!(
                    "{}:{} - {}",
                    display_path(&path),
                    line.number,
                    line.code.trim()
                ));
            }
        }
    }

    assert_no_violations("Core must not use UI crates", &violations);
}

#[test]
fn test_no_unwrap_in_production_code() {
    let mut violations = Vec::new();

    for dir in PRODUCTION_DIRS {
        for path in rust_files(dir) {
            for line in production_lines_of(&path) {
                if line.code.contains(".unwrap()") || line.code.contains(".expect(") {
                    violations.push(format!(
                        "{}:{} - {}",
                        display_path(&path),
                        line.number,
                        line.code.trim()
                    ));
                }
            }
        }
    }

    assert_no_violations("Production code must not unwrap", &violations);
}
