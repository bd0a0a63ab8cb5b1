//! CLI binary integration tests.
//!
//! These tests run the compiled `workitt` binary against a temporary data
//! directory, covering command routing, confirmation handling, and that no
//! secret ever reaches the terminal.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn workitt_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_workitt"));
    cmd.arg("--data-dir")
        .arg(data_dir)
        .env_remove("WORKITT_DATA_DIR")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null());
    cmd
}

fn run(data_dir: &Path, args: &[&str]) -> Output {
    workitt_cmd(data_dir)
        .args(args)
        .output()
        .expect("failed to run workitt")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn generate_key(data_dir: &Path) -> PathBuf {
    let output = run(data_dir, &["key", "generate", "--yes"]);
    assert!(output.status.success(), "key generate failed: {}", stderr(&output));
    PathBuf::from(stdout(&output).trim())
}

#[test]
fn test_cli_version() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["version"]);
    assert!(output.status.success(), "version command should succeed");
    assert!(
        stdout(&output).contains("workitt"),
        "version output should contain 'workitt', got: {}",
        stdout(&output)
    );
}

#[test]
fn test_cli_help() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["--help"]);
    assert!(output.status.success(), "--help should succeed");
    let out = stdout(&output);
    for command in ["key", "ai", "smtp", "config", "backup"] {
        assert!(out.contains(command), "help should mention '{command}', got: {out}");
    }
}

#[test]
fn test_cli_unknown_command() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["nonexistent-command"]);
    assert!(
        !output.status.success(),
        "unknown command should return non-zero exit code"
    );
}

#[test]
fn test_key_generate_requires_confirmation() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["key", "generate"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("Aborted"));
    assert!(!tmp.path().join("key").join(".wm.key").exists());
}

#[test]
fn test_key_generate_and_status() {
    let tmp = TempDir::new().unwrap();
    let before = run(tmp.path(), &["key", "status"]);
    assert!(before.status.success());
    assert!(stdout(&before).contains("[NOT CONFIGURED]"));

    let key_path = generate_key(tmp.path());
    assert!(key_path.ends_with("key/.wm.key"));
    assert_eq!(std::fs::read(&key_path).unwrap().len(), 32);

    let after = run(tmp.path(), &["key", "status"]);
    assert!(after.status.success());
    assert!(stdout(&after).contains("present"));
}

#[test]
fn test_ai_set_without_key_fails() {
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &["ai", "set", "--platform", "openai", "--api-key", "sk-test"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Master key not configured"));
}

#[test]
fn test_secrets_never_printed() {
    let tmp = TempDir::new().unwrap();
    generate_key(tmp.path());

    let output = run(
        tmp.path(),
        &[
            "smtp",
            "set",
            "--host",
            "smtp.example.com",
            "--username",
            "alice@example.com",
            "--password",
            "hunter2",
        ],
    );
    assert!(output.status.success(), "smtp set failed: {}", stderr(&output));

    let output = run(
        tmp.path(),
        &["ai", "set", "--platform", "deepseek", "--api-key", "sk-deep"],
    );
    assert!(output.status.success(), "ai set failed: {}", stderr(&output));

    let stored = std::fs::read_to_string(tmp.path().join("config.json")).unwrap();
    assert!(!stored.contains("hunter2"));
    assert!(!stored.contains("sk-deep"));
    let doc: serde_json::Value = serde_json::from_str(&stored).unwrap();
    let ciphertext = doc["smtp"]["password"].as_str().unwrap().to_string();
    assert!(!ciphertext.is_empty());

    let shown = run(tmp.path(), &["config", "show"]);
    assert!(shown.status.success());
    let text = format!("{}{}", stdout(&shown), stderr(&shown));
    assert!(text.contains("[CONFIGURED]"));
    assert!(text.contains("smtp.example.com"));
    assert!(!text.contains("hunter2"));
    assert!(!text.contains(&ciphertext));

    let json = run(tmp.path(), &["config", "show", "--json"]);
    let masked: serde_json::Value = serde_json::from_str(&stdout(&json)).unwrap();
    assert_eq!(masked["smtp"]["password"], "[CONFIGURED]");
    assert_eq!(masked["artificial_intelligence"]["api_key"], "[CONFIGURED]");
    assert_eq!(masked["artificial_intelligence"]["platform"], "deepseek");

    let valid = run(tmp.path(), &["config", "validate"]);
    assert!(valid.status.success(), "validate failed: {}", stderr(&valid));
}

#[test]
fn test_config_path() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["config", "path"]);
    assert!(output.status.success());
    assert_eq!(
        PathBuf::from(stdout(&output).trim()),
        tmp.path().join("config.json")
    );
}

#[test]
fn test_corrupt_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("config.json"), "{ not json").unwrap();

    let output = run(tmp.path(), &["config", "show"]);
    assert!(!output.status.success());
    // Left in place for the operator to repair.
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("config.json")).unwrap(),
        "{ not json"
    );
}

#[test]
fn test_backup_and_restore() {
    let tmp = TempDir::new().unwrap();
    let original_key = std::fs::read(generate_key(tmp.path())).unwrap();

    let output = run(tmp.path(), &["backup", "create"]);
    assert!(output.status.success(), "backup failed: {}", stderr(&output));
    let backup_dir = PathBuf::from(stdout(&output).trim());
    assert!(backup_dir.join("manifest.json").exists());

    let rotated = std::fs::read(generate_key(tmp.path())).unwrap();
    assert_ne!(original_key, rotated);

    let output = run(
        tmp.path(),
        &["backup", "restore", backup_dir.to_str().unwrap(), "--yes"],
    );
    assert!(output.status.success(), "restore failed: {}", stderr(&output));

    let restored = std::fs::read(tmp.path().join("key").join(".wm.key")).unwrap();
    assert_eq!(original_key, restored);
}
