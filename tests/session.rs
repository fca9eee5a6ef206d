//! Drives the binary through stdin the way an operator would.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const PROMPT: &str = "Enter thumbprint (or EXIT to exit): ";

fn check_certificate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_check-certificate"))
}

fn run_session(store: &Path, input: &str) -> Output {
    let mut child = Command::new(check_certificate_bin())
        .args(["--no-wait", "--no-system-trust", "--store"])
        .arg(store)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait")
}

#[test]
fn test_exit_prints_only_prompts() {
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = run_session(tmp_dir.path(), "\n  \nEXIT\n");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), PROMPT.repeat(3));
}

#[test]
fn test_empty_store_reports_no_certificate() {
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = run_session(tmp_dir.path(), "\nABC123\n");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "session failed: {}", stdout);
    let report = stdout.strip_prefix(&PROMPT.repeat(2)).expect("two prompts");
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 5, "unexpected report: {}", report);
    assert!(lines[3].starts_with("Looking for certificate with thumbprint 'ABC123' in store '"));
    assert_eq!(lines[4], "No certificate found.");
}

#[test]
fn test_unreadable_store_reports_error_and_exits_cleanly() {
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = run_session(&tmp_dir.path().join("missing"), "ABC123\n");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "session failed: {}", stdout);
    assert!(
        stdout.contains("Error: failed to open certificate store"),
        "Should report the store error: {}",
        stdout
    );
    assert!(!stdout.contains("Looking for certificate"));
}
