//! Integration tests for the `refuapp` CLI binary.
//!
//! Parsing, help output and completions run without a server; the
//! rest drive the binary against a wiremock registry. Every test gets
//! its own config and data directories.
#![allow(clippy::unwrap_used)]

use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ID: &str = "507f191e810c19729de860ea";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `refuapp` binary with env isolation.
///
/// Clears all `REFUAPP_*` env vars and points config and data
/// directories into `home` so tests never touch the user's real files.
fn refuapp_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("refuapp");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("REFUAPP_PROFILE")
        .env_remove("REFUAPP_API_URL")
        .env_remove("REFUAPP_OUTPUT")
        .env_remove("REFUAPP_INSECURE")
        .env_remove("REFUAPP_TIMEOUT")
        .env_remove("REFUAPP_USERNAME")
        .env_remove("REFUAPP_PASSWORD");
    cmd
}

/// Run without blocking the runtime the mock server lives on.
async fn run(mut cmd: assert_cmd::Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn refuge(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "region": "Pirineu",
        "image": "no-photo.png",
        "altitude": 2100,
        "coordinates": { "latitude": 42.5, "longitude": 1.5 },
        "capacity": { "winter": 8, "summer": 24 }
    })
}

/// A command already pointed at `server`, with retries off.
fn against(home: &TempDir, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = refuapp_cmd(home);
    cmd.env("REFUAPP_DEFAULTS__MAX_RETRIES", "0")
        .args(["--api-url", &server.uri()]);
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = refuapp_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    refuapp_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("refuge registry")
            .and(predicate::str::contains("refuges"))
            .and(predicate::str::contains("images"))
            .and(predicate::str::contains("login")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    refuapp_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("refuapp"));
}

#[test]
fn test_refuges_subcommands_exist() {
    let home = TempDir::new().unwrap();
    refuapp_cmd(&home)
        .args(["refuges", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("update"))
                .and(predicate::str::contains("delete"))
                .and(predicate::str::contains("watch")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    refuapp_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    refuapp_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases without a server ────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    let output = refuapp_cmd(&home).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_refuges_list_no_config() {
    let home = TempDir::new().unwrap();
    refuapp_cmd(&home)
        .args(["refuges", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_unknown_profile_is_named() {
    let home = TempDir::new().unwrap();
    refuapp_cmd(&home)
        .args(["--profile", "nope", "refuges", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_config_show_no_config() {
    let home = TempDir::new().unwrap();
    refuapp_cmd(&home).args(["config", "show"]).assert().success();
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    refuapp_cmd(&home)
        .args(["config", "set", "api_url", "https://api.refuapp.online"])
        .assert()
        .success();
    refuapp_cmd(&home)
        .args(["config", "set", "timeout", "soon"])
        .assert()
        .code(2);
    refuapp_cmd(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_url = \"https://api.refuapp.online\""));
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    let output = refuapp_cmd(&home)
        .args(["--output", "invalid", "refuges", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_invalid_id_fails_before_any_request() {
    let home = TempDir::new().unwrap();
    // Nothing listens here; an invalid id must not even try.
    refuapp_cmd(&home)
        .args(["--api-url", "http://127.0.0.1:1", "refuges", "get", "not-an-id"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a valid refuge id"));
}

#[test]
fn test_offline_exit_code() {
    let home = TempDir::new().unwrap();
    refuapp_cmd(&home)
        .args(["--api-url", "http://127.0.0.1:1", "refuges", "list"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("offline"));
}

// ── Against a registry ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_as_json() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/refuges/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            refuge(ID, "Refugi de Colomers"),
            refuge("507f191e810c19729de860eb", "Refugi Ventosa")
        ])))
        .mount(&server)
        .await;

    let mut cmd = against(&home, &server);
    cmd.args(["-o", "json-compact", "refuges", "list"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let listed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["name"], "Refugi de Colomers");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plain_list_prints_ids() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/refuges/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([refuge(ID, "Colomers")])))
        .mount(&server)
        .await;

    let mut cmd = against(&home, &server);
    cmd.args(["-o", "plain", "refuges", "list"]);
    let output = run(cmd).await;
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), ID);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_missing_refuge_exits_not_found() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/refuges/{ID}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut cmd = against(&home, &server);
    cmd.args(["refuges", "get", ID]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_server_data_is_reported() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/refuges/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"not": "a list"})))
        .mount(&server)
        .await;

    let mut cmd = against(&home, &server);
    cmd.args(["refuges", "list"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("SERVER_SENT_MALFORMED_DATA"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_needs_confirmation_when_not_interactive() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(refuge(ID, "Colomers")))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = against(&home, &server);
    cmd.args(["refuges", "delete", ID]).write_stdin("");
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_conflict_exit_code() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/refuges/"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let mut cmd = against(&home, &server);
    cmd.args([
        "refuges",
        "create",
        "--name",
        "Colomers",
        "--region",
        "Val d'Aran",
        "--altitude",
        "2135",
        "--latitude",
        "42.617",
        "--longitude",
        "0.925",
    ]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(6));
    assert!(combined_output(&output).contains("already exists"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_authenticated_delete() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .and(body_string_contains("scope"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "abc.def", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/refuges/{ID}")))
        .and(header("authorization", "Bearer abc.def"))
        .respond_with(ResponseTemplate::new(200).set_body_json(refuge(ID, "Colomers")))
        .expect(1)
        .mount(&server)
        .await;

    let mut login = against(&home, &server);
    login
        .env("REFUAPP_PASSWORD", "s3cret")
        .args(["login", "--username", "admin"]);
    let output = run(login).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let mut status = against(&home, &server);
    status.args(["-o", "plain", "status"]);
    let output = run(status).await;
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "true");

    let mut delete = against(&home, &server);
    delete.args(["-y", "refuges", "delete", ID]);
    let output = run(delete).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("deleted"));

    let mut logout = against(&home, &server);
    logout.arg("logout");
    assert!(run(logout).await.status.success());

    let mut status = against(&home, &server);
    status.args(["-o", "plain", "status"]);
    let output = run(status).await;
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "false");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_auth() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut cmd = against(&home, &server);
    cmd.env("REFUAPP_PASSWORD", "wrong")
        .args(["login", "--username", "admin"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(3));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_image_upload_prints_stored_name() {
    let home = TempDir::new().unwrap();
    let image = home.path().join("colomers.png");
    std::fs::write(&image, b"PNGDATA").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/"))
        .and(body_string_contains("PNGDATA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("3f2a.png")))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = against(&home, &server);
    cmd.args(["-o", "plain", "images", "upload"]).arg(&image);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3f2a.png");
}
