//! CLI integration tests
//!
//! Run the `logfacade` binary and check what lands on stderr and in the
//! configured log file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn write_config(dir: &TempDir, filename: &Path, level: &str) -> PathBuf {
    let config_path = dir.path().join("config.json");
    let config = serde_json::json!({
        "service": "unrelated section",
        "logging": { "filename": filename, "level": level },
    });
    fs::write(&config_path, config.to_string()).unwrap();
    config_path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_logfacade"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_emit_writes_to_stderr_without_config() {
    let output = run(&["emit", "--level", "warn", "disk", "almost", "full"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(
        err.contains(r#"level=warning msg="disk almost full""#),
        "stderr: {err}"
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn test_emit_below_default_threshold_is_silent() {
    let output = run(&["emit", "--level", "debug", "hidden"]);

    assert!(output.status.success());
    assert!(!stderr(&output).contains("hidden"));
}

#[test]
fn test_emit_with_fields_into_configured_file() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("app.log");
    let config_path = write_config(&dir, &log_path, "info");

    let output = run(&[
        "--config",
        config_path.to_str().unwrap(),
        "emit",
        "--field",
        "user=alice",
        "--field",
        "attempt=2",
        "login",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let expected = "level=info msg=login attempt=2 user=alice";
    assert!(stderr(&output).contains(expected));
    assert!(fs::read_to_string(&log_path).unwrap().contains(expected));
}

#[test]
fn test_bad_level_in_config_fails() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, Path::new(""), "bogus");

    let output = run(&["--config", config_path.to_str().unwrap(), "emit", "x"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("Error: "), "stderr: {err}");
    assert!(err.contains("bogus"));
}

#[test]
fn test_unopenable_log_file_fails() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("no-such-dir").join("app.log");
    let config_path = write_config(&dir, &log_path, "info");

    let output = run(&["--config", config_path.to_str().unwrap(), "emit", "x"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: "));
}

#[test]
fn test_missing_config_file_fails() {
    let output = run(&["--config", "/no/such/config.json", "emit", "x"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot read config"));
}

#[test]
fn test_fatal_exits_with_status_one() {
    let output = run(&["emit", "--level", "fatal", "giving", "up"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(r#"level=fatal msg="giving up""#));
}

#[test]
fn test_malformed_field_is_rejected() {
    let output = run(&["emit", "--field", "nokey", "x"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("KEY=VALUE"));
}

#[test]
fn test_pipe_logs_each_input_line() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("pipe.log");
    let config_path = write_config(&dir, &log_path, "debug");

    let mut child = Command::new(env!("CARGO_BIN_EXE_logfacade"))
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "pipe",
            "--level",
            "warn",
        ])
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"first line\nsecond\npartial")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let logged: Vec<String> = fs::read_to_string(&log_path)
        .unwrap()
        .lines()
        .filter(|line| line.contains("level=warning"))
        .map(|line| line.split_once(" level=").unwrap().1.to_string())
        .collect();
    assert_eq!(
        logged,
        vec![
            r#"warning msg="first line""#,
            "warning msg=second",
            "warning msg=partial",
        ]
    );
}
