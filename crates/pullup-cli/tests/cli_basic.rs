//! Basic CLI E2E tests.
//!
//! Commands run via cargo with HOME pointed at a per-test temp directory
//! so nothing touches the real user config.

use std::path::PathBuf;
use std::process::Command;

fn temp_home(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pullup-cli-test-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp home");
    dir
}

fn run_cli(home: &PathBuf, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "pullup-cli", "--quiet", "--"])
        .args(args)
        .env("HOME", home)
        .output()
        .expect("failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

#[test]
fn workout_list_starts_empty() {
    let home = temp_home("list");
    let (stdout, _, code) = run_cli(&home, &["workout", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("no workouts configured"));
}

#[test]
fn config_get_returns_defaults() {
    let home = temp_home("config");
    let (stdout, _, code) = run_cli(&home, &["config", "get", "reminder.interval_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");

    let (_, stderr, code) = run_cli(&home, &["config", "get", "reminder.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn add_then_list_shows_the_workout() {
    let home = temp_home("add");
    let (_, stderr, code) = run_cli(
        &home,
        &[
            "workout", "add", "--title", "Test pullups", "--time", "06:30",
            "--days", "Mon,Wed", "--exercise", "[SETS] x [REPS]",
        ],
    );
    assert_eq!(code, 0, "add failed: {stderr}");

    let (stdout, _, code) = run_cli(&home, &["workout", "list", "--json"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Test pullups"));
    assert!(stdout.contains("06:30"));
}

#[test]
fn standup_status_reports_disabled_by_default() {
    let home = temp_home("standup");
    let (stdout, _, code) = run_cli(&home, &["standup", "status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("disabled"));
}

#[test]
fn watch_bounded_by_ticks_exits() {
    let home = temp_home("watch");
    let (stdout, _, code) = run_cli(&home, &["watch", "--ticks", "2"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("watching 0 workout(s)"));
}
