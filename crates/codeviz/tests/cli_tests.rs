use std::{fs, path::PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use tracing::info;

fn write_source(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_help_command() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    cmd.arg("--help").assert().success().stdout(predicate::str::contains("CodeViz"));
}

#[test]
fn test_version_command() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    cmd.arg("--version").assert().success().stdout(predicate::str::contains("codeviz"));
}

#[test]
fn test_trace_emits_parseable_json() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "Demo.java", "int x = 5;\nint y = x;\n");

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    let assert = cmd.arg("trace").arg(&file).assert().success();

    let states: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let states = states.as_array().unwrap();
    assert_eq!(states.len(), 2);
    assert_eq!(states[0]["lineNumber"], 1);
    assert_eq!(states[0]["frames"][0]["name"], "main");
    assert_eq!(states[1]["frames"][0]["variables"]["y"]["value"], "5");
}

#[test]
fn test_grammar_inferred_from_py_extension() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "demo.py", "x = 1\n");

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    let assert = cmd.arg("trace").arg(&file).assert().success();

    let states: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(states[0]["frames"][0]["name"], "global");
}

#[test]
fn test_explicit_grammar_overrides_extension() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "snippet.txt", "int x = 5;\n");

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    let assert = cmd.arg("trace").arg(&file).arg("--grammar").arg("java").assert().success();

    let states: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(states[0]["frames"][0]["name"], "main");
}

#[test]
fn test_grammar_from_environment() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "snippet.txt", "int x = 5;\n");

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    let assert =
        cmd.env("CODEVIZ_GRAMMAR", "java").arg("trace").arg(&file).assert().success();

    let states: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(states[0]["frames"][0]["name"], "main");
}

#[test]
fn test_unknown_grammar_fails() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "demo.py", "x = 1\n");

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    cmd.arg("trace")
        .arg(&file)
        .arg("--grammar")
        .arg("COBOL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported grammar: COBOL"));
}

#[test]
fn test_unknown_extension_without_grammar_fails() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "snippet.txt", "x = 1\n");

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    cmd.arg("trace")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot infer a grammar"));
}

#[test]
fn test_missing_file_fails() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    cmd.arg("trace").arg("does_not_exist.java").assert().failure();
}

#[test]
fn test_play_renders_steps() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "Demo.java", "int x = 5;\nFoo f = new Foo();\n");

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    cmd.arg("play")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Step 1/2 (line 1) ==="))
        .stdout(predicate::str::contains("x = 5"))
        .stdout(predicate::str::contains("object #1 : Foo"));
}

#[test]
fn test_play_flags_input_steps() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "demo.py", "name = input(\"? \")\n");

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    cmd.arg("play")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("(this step would prompt for input)"));
}

#[test]
fn test_loop_ceiling_flag() {
    codeviz_common::logging::ensure_test_logging();
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = write_source(
        &dir,
        "demo.py",
        "total = 0\nwhile True:\n    total = total + 1\ndone = 1\n",
    );

    let mut cmd = Command::cargo_bin("codeviz").unwrap();
    let assert = cmd
        .arg("--max-loop-iterations")
        .arg("2")
        .arg("trace")
        .arg(&file)
        .assert()
        .success();

    let states: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let body_visits = states
        .as_array()
        .unwrap()
        .iter()
        .filter(|state| state["lineNumber"] == 3)
        .count();
    assert_eq!(body_visits, 2);
}
