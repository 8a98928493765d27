//! Integration tests for the `rigwatch` CLI binary.
//!
//! Argument parsing, config management and error exit codes, plus one
//! status run against a wiremock daemon. Nothing touches the user's real
//! configuration.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `rigwatch` binary with env isolation.
///
/// Clears all `RIGWATCH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn rigwatch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rigwatch");
    cmd.env("HOME", "/tmp/rigwatch-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/rigwatch-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("RIGWATCH_RIG")
        .env_remove("RIGWATCH_HOST")
        .env_remove("RIGWATCH_PORT")
        .env_remove("RIGWATCH_CONFIG")
        .env_remove("RIGWATCH_OUTPUT")
        .env_remove("RIGWATCH_TIMEOUT");
    cmd
}

/// Same as [`rigwatch_cmd`], with `--config` pointing at `path`.
fn rigwatch_with_config(path: &Path) -> assert_cmd::Command {
    let mut cmd = rigwatch_cmd();
    cmd.arg("--config").arg(path);
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = rigwatch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    rigwatch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Excavator")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("probe")),
    );
}

#[test]
fn test_version_flag() {
    rigwatch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rigwatch"));
}

#[test]
fn test_completions_bash() {
    rigwatch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rigwatch"));
}

#[test]
fn test_invalid_output_format() {
    let output = rigwatch_cmd().args(["-o", "xml", "status"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config management ───────────────────────────────────────────────

#[test]
fn test_status_without_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = rigwatch_with_config(&dir.path().join("config.toml"))
        .arg("status")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("No rig configured"));
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    rigwatch_with_config(&config)
        .args(["config", "init", "--name", "garage", "--host", "10.0.0.2"])
        .assert()
        .success();

    rigwatch_with_config(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[rigs.garage]")
                .and(predicate::str::contains("host = \"10.0.0.2\""))
                .and(predicate::str::contains("default_rig = \"garage\"")),
        );
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    rigwatch_with_config(&config)
        .args(["config", "init", "--host", "10.0.0.2"])
        .assert()
        .success();

    let output = rigwatch_with_config(&config)
        .args(["config", "init", "--host", "10.0.0.3"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    rigwatch_with_config(&config)
        .args(["config", "init", "--host", "10.0.0.3", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_init_rejects_out_of_range_interval() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let output = rigwatch_with_config(&config)
        .args(["config", "init", "--host", "10.0.0.2", "--update-interval", "0"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("invalid_update_interval"));
    assert!(!config.exists());
}

#[test]
fn test_config_validate_reports_bad_port() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[rigs.garage]\nhost = \"10.0.0.2\"\nport = 70000\n").unwrap();

    let output = rigwatch_with_config(&config)
        .args(["-o", "plain", "config", "validate"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("invalid_port"));
}

#[test]
fn test_config_path_honors_flag() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");

    rigwatch_with_config(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_unknown_rig_profile() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[rigs.garage]\nhost = \"10.0.0.2\"\n").unwrap();

    let output = rigwatch_with_config(&config)
        .args(["--rig", "attic", "status"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("garage"));
}

// ── Unreachable rigs ────────────────────────────────────────────────

#[test]
fn test_status_against_closed_port_is_offline() {
    let dir = tempfile::tempdir().unwrap();
    let output = rigwatch_with_config(&dir.path().join("config.toml"))
        .args(["--host", "127.0.0.1", "--port", "9", "--timeout", "2", "status"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("offline"));
}

#[test]
fn test_probe_against_closed_port_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = rigwatch_with_config(&dir.path().join("config.toml"))
        .args(["--host", "127.0.0.1", "--port", "9", "--timeout", "2", "probe"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("no_response"));
}

#[test]
fn test_probe_rejects_bad_port_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let output = rigwatch_with_config(&dir.path().join("config.toml"))
        .args(["--host", "127.0.0.1", "--port", "0", "probe"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("invalid_port"));
}

// ── Live daemon ─────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_status_json_against_mock_daemon() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("command", r#"{"id":1,"method":"info","params":[]}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "1.7.5d",
            "build_number": 7,
            "uptime": 5400,
            "id": 1,
            "error": null
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("command", r#"{"id":1,"method":"devices.get","params":[]}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [{ "device_id": 0, "name": "RTX 3080", "gpu_temp": 65 }]
        })))
        .mount(&server)
        .await;

    let addr = *server.address();
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let output = tokio::task::spawn_blocking(move || {
        rigwatch_with_config(&config)
            .args(["--host", &addr.ip().to_string()])
            .args(["--port", &addr.port().to_string()])
            .args(["-o", "json", "status"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["rig"], "adhoc");
    assert_eq!(report["summary"]["online"], true);
    assert_eq!(report["summary"]["model"], "1x RTX 3080");
    assert_eq!(report["summary"]["sw_version"], "1.7.5d, Build: 7");
    assert_eq!(report["summary"]["uptime_hours"], 1.5);
    assert_eq!(report["devices"][0]["gpu_temp"], 65.0);
    assert!(report["algorithms"].as_array().unwrap().is_empty());
}
