//! Integration tests for the `unireap` CLI binary.
//!
//! Argument parsing, completions, and config errors run without a
//! controller; full runs go against a wiremock controller.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `unireap` binary with env isolation.
///
/// Clears all `UNIREAP_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn unireap_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("unireap");
    cmd.env("HOME", "/tmp/unireap-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/unireap-cli-test-nonexistent")
        .env_remove("UNIREAP_CONFIG")
        .env_remove("UNIREAP_OUTPUT")
        .env_remove("RUST_LOG")
        .env("UNIREAP_TEST_PASSWORD", "secret");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_config(dir: &Path, server: &MockServer) -> PathBuf {
    let path = dir.join("config.yaml");
    std::fs::write(
        &path,
        format!(
            "version: '0.2'\n\
             sites:\n  \
               - host: {}\n    \
                 username: admin\n    \
                 passwordEnv: UNIREAP_TEST_PASSWORD\n",
            server.uri()
        ),
    )
    .unwrap();
    path
}

fn ghost(mac: &str) -> Value {
    json!({ "mac": mac, "tx_bytes": 0, "rx_bytes": 0 })
}

async fn controller(clients: Vec<Value>, forget_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "unique_id": "u-1" }))
                .insert_header("X-Csrf-Token", "tok"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/alluser"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "meta": { "rc": "ok" }, "data": clients })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/s/default/cmd/stamgr"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] })),
        )
        .expect(forget_calls)
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    unireap_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("UniFi")
            .and(predicate::str::contains("--dry-run"))
            .and(predicate::str::contains("--config-version"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_version_flag() {
    unireap_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unireap"));
}

#[test]
fn test_invalid_config_version_is_usage_error() {
    let output = unireap_cmd()
        .args(["--config-version", "0.3"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("0.3"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    unireap_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    unireap_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_config_exits_with_config_code() {
    let output = unireap_cmd()
        .args(["--config", "/tmp/unireap-cli-test-nonexistent/config.yaml"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(10));
    let text = combined_output(&output);
    assert!(text.contains("not found"), "{text}");
}

#[test]
fn test_config_path_from_env() {
    let output = unireap_cmd()
        .env("UNIREAP_CONFIG", "/tmp/unireap-cli-test-nonexistent/from-env.yaml")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(10));
    assert!(combined_output(&output).contains("from-env.yaml"));
}

#[test]
fn test_empty_site_list_exits_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "version: '0.2'\nsites: []\n").unwrap();

    let output = unireap_cmd().arg("--config").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(10));
    assert!(combined_output(&output).contains("no sites configured"));
}

#[test]
fn test_legacy_schema_requires_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "host: https://udm.local\n").unwrap();

    let output = unireap_cmd()
        .arg("--config")
        .arg(&path)
        .args(["--config-version", "0.1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(10));
}

// ── Full runs ───────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_run_forgets_idle_clients() {
    let server = controller(
        vec![
            ghost("aa:bb:cc:dd:ee:01"),
            json!({ "mac": "aa:bb:cc:dd:ee:02", "name": "printer" }),
            ghost("aa:bb:cc:dd:ee:03"),
        ],
        1,
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server);

    let output = unireap_cmd()
        .arg("--config")
        .arg(&config)
        .args(["-o", "json"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["devices_forgotten"], 2);
    assert_eq!(report["sites"][0]["status"], "completed");
    assert_eq!(report["sites"][0]["clients_discovered"], 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dry_run_prints_candidates_only() {
    let server = controller(
        vec![ghost("aa:bb:cc:dd:ee:01"), ghost("aa:bb:cc:dd:ee:02")],
        0,
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server);

    unireap_cmd()
        .arg("--config")
        .arg(&config)
        .args(["--dry-run", "-o", "plain"])
        .assert()
        .success()
        .stdout("aa:bb:cc:dd:ee:01\naa:bb:cc:dd:ee:02\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.Invalid" },
            "data": []
        })))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server);

    let output = unireap_cmd()
        .arg("--config")
        .arg(&config)
        .args(["--color", "never"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("login failed"), "{text}");
}
