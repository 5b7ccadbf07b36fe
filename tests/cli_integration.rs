//! Integration tests for the `yp` CLI.
//!
//! Each test creates a temp directory, runs `yp` as a subprocess against a
//! task file inside it, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `yp` binary.
fn yp_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("yp");
    path
}

fn tasks_file(dir: &Path) -> PathBuf {
    dir.join("tasks.json")
}

/// Run `yp` against `dir/tasks.json`, returning (stdout, stderr, success).
///
/// XDG_CONFIG_HOME points into the temp dir so a user config never leaks in.
fn run_yp(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let file = tasks_file(dir);
    let output = Command::new(yp_bin())
        .arg("--file")
        .arg(&file)
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run yp");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `yp` expecting success, return stdout.
fn run_yp_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_yp(dir, args);
    if !success {
        panic!(
            "yp {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `yp` expecting failure, return stderr.
fn run_yp_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_yp(dir, args);
    if success {
        panic!("yp {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

fn read_json(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(tasks_file(dir)).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_and_list() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_yp_ok(tmp.path(), &["add", "2025-03-14", "write spec"]);
    assert!(out.contains("added task 1 on 2025-03-14"));
    let out = run_yp_ok(tmp.path(), &["add", "2025-03-14", "  review  "]);
    assert!(out.contains("added task 2"));

    let out = run_yp_ok(tmp.path(), &["list", "2025-03-14"]);
    assert_eq!(out, "[ 1 ] write spec\n[ 2 ] review\n");

    let json = read_json(tmp.path());
    assert_eq!(json["2025"]["3"]["14"][1], "review");
}

#[test]
fn test_add_rejects_blank_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_yp_err(tmp.path(), &["add", "2025-03-14", "   "]);
    assert!(err.contains("task text is empty"));
    assert!(!tasks_file(tmp.path()).exists());
}

#[test]
fn test_invalid_date_rejected_before_store() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_yp_err(tmp.path(), &["add", "2025-13-01", "nope"]);
    assert!(err.contains("not a calendar date"));
    let err = run_yp_err(tmp.path(), &["add", "2025-02-29", "nope"]);
    assert!(err.contains("not a calendar date"));
    assert!(!tasks_file(tmp.path()).exists());
}

#[test]
fn test_delete_shifts_positions() {
    let tmp = tempfile::TempDir::new().unwrap();
    for t in ["a", "b", "c"] {
        run_yp_ok(tmp.path(), &["add", "2025-03-14", t]);
    }

    let out = run_yp_ok(tmp.path(), &["delete", "2025-03-14", "1"]);
    assert!(out.contains(": a"));
    let out = run_yp_ok(tmp.path(), &["list", "2025-03-14"]);
    assert_eq!(out, "[ 1 ] b\n[ 2 ] c\n");
}

#[test]
fn test_delete_out_of_range() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_yp_ok(tmp.path(), &["add", "2025-03-14", "only"]);
    let before = fs::read(tasks_file(tmp.path())).unwrap();

    let err = run_yp_err(tmp.path(), &["delete", "2025-03-14", "2"]);
    assert!(err.contains("no task 2 on 2025-03-14"));
    let err = run_yp_err(tmp.path(), &["delete", "2025-03-14", "0"]);
    assert!(err.contains("task numbers start at 1"));
    let err = run_yp_err(tmp.path(), &["delete", "2025-03-15", "1"]);
    assert!(err.contains("no tasks on 2025-03-15"));

    assert_eq!(fs::read(tasks_file(tmp.path())).unwrap(), before);
}

#[test]
fn test_delete_last_task_removes_year() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_yp_ok(tmp.path(), &["add", "2025-03-14", "only"]);
    run_yp_ok(tmp.path(), &["add", "2026-01-01", "next year"]);
    run_yp_ok(tmp.path(), &["delete", "2025-03-14", "1"]);

    let json = read_json(tmp.path());
    assert!(json.get("2025").is_none());
    assert!(json.get("2026").is_some());
}

#[test]
fn test_clear() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_yp_ok(tmp.path(), &["add", "2025-03-14", "write spec"]);
    run_yp_ok(tmp.path(), &["add", "2025-03-14", "review"]);

    let out = run_yp_ok(tmp.path(), &["clear", "2025-03-14"]);
    assert!(out.contains("cleared 2 task(s)"));
    let out = run_yp_ok(tmp.path(), &["list", "2025-03-14"]);
    assert_eq!(out, "No tasks for this date.\n");
    assert_eq!(fs::read_to_string(tasks_file(tmp.path())).unwrap(), "{}");

    let out = run_yp_ok(tmp.path(), &["clear", "2025-03-14"]);
    assert!(out.contains("no tasks to clear"));
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_yp_ok(tmp.path(), &["add", "2025-03-14", "pi"]);

    let out = run_yp_ok(tmp.path(), &["list", "2025-03-14", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["date"], "2025-03-14");
    assert_eq!(parsed["tasks"][0]["number"], 1);
    assert_eq!(parsed["tasks"][0]["text"], "pi");
}

#[test]
fn test_dates_and_highlight() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_yp_ok(tmp.path(), &["add", "2025-03-14", "pi"]);
    run_yp_ok(tmp.path(), &["add", "2025-03-01", "rent"]);
    run_yp_ok(tmp.path(), &["add", "2025-07-04", "fireworks"]);

    let out = run_yp_ok(tmp.path(), &["dates", "2025", "3"]);
    assert_eq!(out, "1 14\n");
    let out = run_yp_ok(tmp.path(), &["dates", "2025", "4"]);
    assert!(out.contains("no tasks in 2025-04"));

    let out = run_yp_ok(tmp.path(), &["highlight", "2025", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["months"]["3"], serde_json::json!([1, 14]));
    assert_eq!(parsed["months"]["7"], serde_json::json!([4]));
    assert_eq!(parsed["months"]["1"], serde_json::json!([]));

    let out = run_yp_ok(tmp.path(), &["highlight", "2025"]);
    assert!(out.contains("March:"));
    assert!(out.contains("July:"));
    assert!(!out.contains("January"));
}

#[test]
fn test_dates_rejects_bad_month() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_yp_err(tmp.path(), &["dates", "2025", "13"]);
}

#[test]
fn test_export() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_yp_ok(tmp.path(), &["add", "2025-03-14", "<b>pi</b>"]);
    let dest = tmp.path().join("tasks.html");

    let out = run_yp_ok(tmp.path(), &["export", "-o", dest.to_str().unwrap()]);
    assert!(out.contains("tasks.html"));
    let html = fs::read_to_string(&dest).unwrap();
    assert!(html.contains("March 14, 2025"));
    assert!(html.contains("&lt;b&gt;pi&lt;/b&gt;"));
}

// ---------------------------------------------------------------------------
// Corruption handling
// ---------------------------------------------------------------------------

#[test]
fn test_corrupt_file_is_backed_up() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tasks_file(tmp.path()), r#"[["not", "a", "mapping"]]"#).unwrap();

    let (stdout, stderr, success) = run_yp(tmp.path(), &["list", "2025-03-14"]);
    assert!(success);
    assert_eq!(stdout, "No tasks for this date.\n");
    assert!(stderr.contains("warning:"));
    assert!(stderr.contains("tasks.json.backup"));

    let backup = tmp.path().join("tasks.json.backup");
    assert_eq!(
        fs::read_to_string(backup).unwrap(),
        r#"[["not", "a", "mapping"]]"#
    );

    // The next write starts from an empty store.
    run_yp_ok(tmp.path(), &["add", "2025-03-14", "fresh"]);
    let json = read_json(tmp.path());
    assert_eq!(json, serde_json::json!({"2025": {"3": {"14": ["fresh"]}}}));
}

#[test]
fn test_check() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_yp_ok(tmp.path(), &["check"]);
    assert!(out.contains("no task file"));

    run_yp_ok(tmp.path(), &["add", "2025-03-14", "pi"]);
    let out = run_yp_ok(tmp.path(), &["check"]);
    assert!(out.contains("is valid (1 tasks)"));

    fs::write(tasks_file(tmp.path()), r#"{"2025": {"3": {"14": 3}}}"#).unwrap();
    let err = run_yp_err(tmp.path(), &["check", "--json"]);
    assert!(err.contains("/2025/3/14"));
    // check never moves the file aside
    assert!(tasks_file(tmp.path()).exists());
    assert!(!tmp.path().join("tasks.json.backup").exists());
}

#[test]
fn test_config_file_sets_task_path() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config_dir = tmp.path().join("config/planner");
    fs::create_dir_all(&config_dir).unwrap();
    let configured = tmp.path().join("from-config.json");
    fs::write(
        config_dir.join("config.toml"),
        format!("[storage]\nfile = {:?}\n", configured.to_str().unwrap()),
    )
    .unwrap();

    let output = Command::new(yp_bin())
        .args(["add", "2025-03-14", "configured"])
        .current_dir(tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("config"))
        .output()
        .expect("failed to run yp");
    assert!(output.status.success());
    assert!(configured.exists());
}
