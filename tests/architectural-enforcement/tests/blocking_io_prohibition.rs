//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Production code MUST NOT use blocking I/O. The backend is
//! reached through async `reqwest`; terminal input comes from crossterm's
//! async `EventStream`.

use architectural_enforcement::{
    assert_no_violations, display_path, production_lines_of, rust_files, PRODUCTION_DIRS,
};

/// Forbidden patterns and what they are
const FORBIDDEN: &[(&str, &str)] = &[
    ("std::fs", "Blocking file I/O"),
    ("std::net", "Blocking network I/O"),
    ("std::process::Command", "Blocking process I/O"),
    ("reqwest::blocking", "Blocking HTTP client"),
    ("crossterm::event::read(", "Blocking terminal read"),
    ("event::poll(", "Blocking terminal poll"),
];

fn blocking_io(code: &str) -> Option<&'static str> {
    FORBIDDEN
        .iter()
        .find(|(pattern, _)| code.contains(pattern))
        .map(|(_, what)| *what)
}

#[test]
fn test_no_blocking_io_in_production_code() {
    let mut violations = Vec::new();

    for dir in PRODUCTION_DIRS {
        for path in rust_files(dir) {
            for line in production_lines_of(&path) {
                if let Some(what) = blocking_io(&line.code) {
                    violations.push(format!(
                        "{}:{} - {}: {}",
                        display_path(&path),
                        line.number,
                        what,
                        line.code.trim()
                    ));
                }
            }
        }
    }

    assert_no_violations("All I/O must be async", &violations);
}

#[test]
fn test_blocking_io_detection() {
    assert_eq!(
        blocking_io("let contents = std::fs::read_to_string(\"file.txt\")?;"),
        Some("Blocking file I/O")
    );
    assert_eq!(
        blocking_io("let body = reqwest::blocking::get(url)?;"),
        Some("Blocking HTTP client")
    );
    assert_eq!(blocking_io("let response = self.http_client.get(url).send().await?;"), None);
}
