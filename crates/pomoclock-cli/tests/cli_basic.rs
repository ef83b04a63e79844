//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary and verify outputs. Every invocation points
//! at a throwaway config path so the user's real config is never read.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str], stdin: Option<&str>) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pomoclock"))
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut pipe = child.stdin.take().expect("stdin is piped");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    let output = child.wait_with_output().expect("wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

fn config_arg(dir: &Path) -> String {
    dir.join("config.toml").display().to_string()
}

fn events(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is a JSON event"))
        .collect()
}

#[test]
fn test_simulate_full_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_arg(dir.path());
    let (stdout, stderr, code) = run_cli(&["simulate", "--config", &cfg, "--wait-for-start"], None);
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let events = events(&stdout);
    let completions: Vec<_> = events
        .iter()
        .filter(|e| e["type"] == "interval_completed")
        .collect();
    assert_eq!(completions.len(), 8);

    let finished: Vec<_> = completions
        .iter()
        .map(|e| e["finished_mode"].as_str().unwrap())
        .collect();
    assert_eq!(
        finished,
        vec![
            "work",
            "short_break",
            "work",
            "short_break",
            "work",
            "short_break",
            "work",
            "long_break"
        ]
    );
    assert_eq!(completions[6]["next_mode"], "long_break");
    assert_eq!(completions[6]["completed_work_sessions"], 4);
    assert_eq!(completions[7]["completed_work_sessions"], 0);
    assert!(completions.iter().all(|e| e["auto_started"] == false));

    let last = events.last().unwrap();
    assert_eq!(last["type"], "state_snapshot");
    assert_eq!(last["display"], "25:00");
}

#[test]
fn test_simulate_auto_start_needs_single_start() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_arg(dir.path());
    let (stdout, _, code) = run_cli(
        &[
            "simulate",
            "--config",
            &cfg,
            "--auto-start",
            "--intervals",
            "3",
            "--work",
            "1",
            "--short-break",
            "1",
        ],
        None,
    );
    assert_eq!(code, 0);

    let events = events(&stdout);
    let starts = events.iter().filter(|e| e["type"] == "timer_started").count();
    assert_eq!(starts, 1);
    let completions = events
        .iter()
        .filter(|e| e["type"] == "interval_completed" && e["auto_started"] == true)
        .count();
    assert_eq!(completions, 3);
}

#[test]
fn test_simulate_rejects_zero_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_arg(dir.path());
    let (_, stderr, code) = run_cli(&["simulate", "--config", &cfg, "--work", "0"], None);
    assert_ne!(code, 0);
    assert!(stderr.contains("minutes"), "unexpected stderr: {stderr}");
}

#[test]
fn test_bad_minutes_flag_is_named() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_arg(dir.path());
    let (_, stderr, code) = run_cli(&["simulate", "--config", &cfg, "--short-break", "0"], None);
    assert_ne!(code, 0);
    assert!(
        stderr.contains("'--short-break' must be a positive number of minutes"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_default_logging_shows_completions() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_pomoclock"))
        .args([
            "simulate",
            "--config",
            &config_arg(dir.path()),
            "--intervals",
            "1",
            "--work",
            "1",
        ])
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("interval completed"), "unexpected stderr: {stderr}");
}

#[test]
fn test_config_set_get_show() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_arg(dir.path());

    let (_, _, code) = run_cli(&["config", "init", "--config", &cfg], None);
    assert_eq!(code, 0);
    let (_, _, code) = run_cli(&["config", "init", "--config", &cfg], None);
    assert_ne!(code, 0, "init must not overwrite without --force");

    let (stdout, _, code) = run_cli(&["config", "set", "timer.work_minutes", "50", "--config", &cfg], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = run_cli(&["config", "get", "timer.work_minutes", "--config", &cfg], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "50");

    let (stdout, _, code) = run_cli(&["config", "show", "--config", &cfg], None);
    assert_eq!(code, 0);
    assert!(stdout.contains("work_minutes = 50"));
}

#[test]
fn test_config_set_rejects_zero() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_arg(dir.path());
    let (_, stderr, code) = run_cli(&["config", "set", "timer.short_break_minutes", "0", "--config", &cfg], None);
    assert_ne!(code, 0);
    assert!(stderr.contains("short_break_minutes"));
    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn test_config_get_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_arg(dir.path());
    let (_, stderr, code) = run_cli(&["config", "get", "timer.volume", "--config", &cfg], None);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_run_reads_commands_until_quit() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_arg(dir.path());
    let (stdout, stderr, code) = run_cli(
        &["run", "--config", &cfg],
        Some("lb\nstatus\nset work 0\nq\n"),
    );
    assert_eq!(code, 0, "run failed: {stderr}");
    assert!(stdout.contains("Long Break"));
    assert!(stdout.contains("\"type\": \"state_snapshot\""));
    assert!(stdout.contains("15:00"));
    assert!(stderr.contains("positive"), "unexpected stderr: {stderr}");
}

#[test]
fn test_run_exits_when_stdin_closes() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_arg(dir.path());
    let (stdout, _, code) = run_cli(&["run", "--config", &cfg], Some(""));
    assert_eq!(code, 0);
    assert!(stdout.contains("25:00"));
}
