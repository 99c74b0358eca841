//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT sleep. Recurring work runs on
//! `tokio::time::interval` and one-off delays use `sleep_until` against an
//! interval tick.
//! **Exception**: frame pacing in `tui/src/app.rs`.

use architectural_enforcement::{
    assert_no_violations, display_path, production_lines, production_lines_of, rust_files,
    CodeLine,
};

/// Lines before a sleep searched for frame-pacing context
const FRAME_CONTEXT_LINES: usize = 10;

fn is_sleep_call(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(")
}

/// Sleep in the TUI event loop paces frames, which is allowed
fn is_frame_pacing(lines: &[CodeLine], idx: usize) -> bool {
    lines[idx.saturating_sub(FRAME_CONTEXT_LINES)..=idx]
        .iter()
        .any(|line| {
            let code = line.code.to_lowercase();
            code.contains("frame") || code.contains("fps")
        })
}

fn find_sleep_violations(dir: &str, allow_frame_pacing_in: Option<&str>) -> Vec<String> {
    let mut violations = Vec::new();

    for path in rust_files(dir) {
        let lines = production_lines_of(&path);
        let pacing_allowed =
            allow_frame_pacing_in.is_some_and(|file| path.ends_with(file));

        for (idx, line) in lines.iter().enumerate() {
            if !is_sleep_call(&line.code) {
                continue;
            }
            if pacing_allowed && is_frame_pacing(&lines, idx) {
                continue;
            }
            violations.push(format!(
                "{}:{} - {}",
                display_path(&path),
                line.number,
                line.code.trim()
            ));
        }
    }

    violations
}

#[test]
fn test_no_sleep_in_core() {
    let violations = find_sleep_violations("conductor/core/src", None);
    assert_no_violations("No sleep in the core (use intervals)", &violations);
}

#[test]
fn test_no_sleep_in_tui_outside_frame_pacing() {
    let violations = find_sleep_violations("tui/src", Some("app.rs"));
    assert_no_violations("No sleep in the TUI except frame pacing", &violations);
}

#[test]
fn test_sleep_detection() {
    let lines = production_lines(
        "async fn poll() {\n    tokio::time::sleep(Duration::from_millis(10)).await;\n}\n",
    );
    assert!(is_sleep_call(&lines[1].code));
    assert!(!is_frame_pacing(&lines, 1));
}

#[test]
fn test_sleep_until_is_not_sleep() {
    assert!(!is_sleep_call("time::sleep_until(tick + pulse).await;"));
}

#[test]
fn test_frame_pacing_detection() {
    let lines = production_lines(
        "fn render_loop() {\n    let frame_duration = Duration::from_millis(50);\n    loop {\n        render();\n        tokio::time::sleep(frame_duration).await;\n    }\n}\n",
    );
    assert!(is_frame_pacing(&lines, 4));
}
