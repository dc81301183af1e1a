//! End-to-end tests for the lintrc binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn lintrc() -> Command {
    Command::cargo_bin("lintrc").unwrap()
}

fn write_config(dir: &TempDir, content: &str) {
    fs::write(dir.path().join(".lintrc.json"), content).unwrap();
}

#[test]
fn version_prints_crate_version() {
    lintrc()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn resolve_applies_override_for_matching_path() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"[
            {"rules": {"no-console": "warn"}},
            {"files": "*.test.js", "rules": {"no-console": "off"}}
        ]"#,
    );

    lintrc()
        .current_dir(dir.path())
        .args(["resolve", "foo.test.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""severity": "off""#));

    lintrc()
        .current_dir(dir.path())
        .args(["resolve", "foo.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""severity": "warn""#));
}

#[test]
fn resolve_reports_excluded_paths() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"{"rules": {"no-console": "warn"}, "ignorePatterns": ["dist"]}"#,
    );

    lintrc()
        .current_dir(dir.path())
        .args(["resolve", "dist/bundle.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("excluded"));
}

#[test]
fn resolve_strict_fails_on_unknown_plugin_rule() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"{"rules": {"sonarjs/no-identical-functions": "warn"}}"#,
    );

    lintrc()
        .current_dir(dir.path())
        .args(["resolve", "--strict", "app.js"])
        .assert()
        .failure();
}

#[test]
fn check_summarizes_resolution() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"{"rules": {"no-console": "warn"}, "ignorePatterns": ["dist"]}"#,
    );
    fs::write(dir.path().join("app.js"), "console.log(1)\n").unwrap();
    fs::create_dir(dir.path().join("dist")).unwrap();
    fs::write(dir.path().join("dist/bundle.js"), "x\n").unwrap();

    lintrc()
        .current_dir(dir.path())
        .args(["check", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 excluded"));
}

#[test]
fn config_validate_accepts_valid_config() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{"rules": {"no-console": "warn"}}"#);

    lintrc()
        .current_dir(dir.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_validate_rejects_malformed_glob() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{"files": "[unclosed", "rules": {}}"#);

    lintrc()
        .current_dir(dir.path())
        .args(["config", "validate"])
        .assert()
        .failure();
}

#[test]
fn config_init_creates_starter_file() {
    let dir = TempDir::new().unwrap();

    lintrc()
        .current_dir(dir.path())
        .args(["config", "init"])
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join(".lintrc.json")).unwrap();
    assert!(content.contains("ignorePatterns"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{"rules": {}}"#);

    lintrc()
        .current_dir(dir.path())
        .args(["config", "init"])
        .assert()
        .failure();

    let content = fs::read_to_string(dir.path().join(".lintrc.json")).unwrap();
    assert_eq!(content, r#"{"rules": {}}"#);
}
