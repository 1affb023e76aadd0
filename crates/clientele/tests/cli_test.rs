//! Integration tests for the `clientele` CLI binary.
//!
//! Argument parsing, help output and completions run without an appliance;
//! the flows run against a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `clientele` binary with env isolation.
///
/// Clears all `CLIENTELE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn clientele_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("clientele");
    cmd.env("HOME", "/tmp/clientele-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/clientele-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("CLIENTELE_PROFILE")
        .env_remove("CLIENTELE_URL")
        .env_remove("CLIENTELE_SID")
        .env_remove("CLIENTELE_OUTPUT")
        .env_remove("CLIENTELE_INSECURE")
        .env_remove("CLIENTELE_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn appliance() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "groups": [
                { "id": 0, "name": "Default", "enabled": true },
                { "id": 3, "name": "Kids", "enabled": false }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clients": [
                {
                    "id": 4, "client": "192.168.1.20", "name": "tablet",
                    "comment": "Tom &amp; Jerry", "groups": [0, 3],
                    "date_added": 1_700_000_000, "date_modified": 1_700_000_000
                },
                {
                    "id": 2, "client": "192.168.1.3", "name": null,
                    "comment": null, "groups": [0],
                    "date_added": 1_700_000_000, "date_modified": 1_700_000_000
                }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/info/ftl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ftl": { "database": { "clients": 2 } }
        })))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = clientele_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    clientele_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("clients")
            .and(predicate::str::contains("groups"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    clientele_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clientele"));
}

#[test]
fn test_clients_subcommands_exist() {
    clientele_cmd()
        .args(["clients", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("suggestions"))
                .and(predicate::str::contains("add"))
                .and(predicate::str::contains("comment"))
                .and(predicate::str::contains("delete")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_zsh() {
    clientele_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    clientele_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_clients_list_without_appliance() {
    let output = clientele_cmd().args(["clients", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("No appliance configured"));
}

#[test]
fn test_delete_requires_a_client() {
    let output = clientele_cmd()
        .args(["clients", "delete", "--url", "http://127.0.0.1:9"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_add_empty_input_is_usage_error() {
    // Validation happens before any request, so the unreachable URL is fine.
    let output = clientele_cmd()
        .args(["clients", "add", "   ", "--url", "http://127.0.0.1:9"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Please specify a client IP or MAC address"));
}

#[test]
fn test_add_invalid_input_is_usage_error() {
    let output = clientele_cmd()
        .args(["clients", "add", "not a host", "--url", "http://127.0.0.1:9"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(
        combined_output(&output)
            .contains("Input is neither a valid IP or MAC address nor a valid host name!")
    );
}

#[test]
fn test_config_path_prints_location() {
    clientele_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Flows against a mock appliance ──────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_clients_list_orders_by_address() {
    let server = appliance().await;

    let output = clientele_cmd()
        .args(["clients", "list", "--sort", "client", "-o", "plain", "--url"])
        .arg(server.uri())
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "192.168.1.3\n192.168.1.20");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clients_list_table_shows_groups_and_comment() {
    let server = appliance().await;

    clientele_cmd()
        .args(["clients", "list", "--search", "tablet", "--url"])
        .arg(server.uri())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Tom & Jerry")
                .and(predicate::str::contains("Default, Kids"))
                .and(predicate::str::contains("192.168.1.3").not()),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_rejection_shows_server_text() {
    let server = appliance().await;
    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(400).set_body_string("UNIQUE constraint failed"))
        .mount(&server)
        .await;

    let output = clientele_cmd()
        .args(["clients", "add", "192.168.1.20", "--url"])
        .arg(server.uri())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("Error while adding new client"), "{text}");
    assert!(text.contains("UNIQUE constraint failed"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_refuses_when_not_interactive() {
    let server = appliance().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let output = clientele_cmd()
        .args(["clients", "delete", "192.168.1.3", "--url"])
        .arg(server.uri())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_unknown_client_is_not_found() {
    let server = appliance().await;

    let output = clientele_cmd()
        .args(["clients", "delete", "10.9.9.9", "--yes", "--url"])
        .arg(server.uri())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes_reports_each_client() {
    let server = appliance().await;
    Mock::given(method("DELETE"))
        .and(path("/api/clients/192.168.1.3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    clientele_cmd()
        .args(["clients", "delete", "192.168.1.3", "--yes", "--url"])
        .arg(server.uri())
        .assert()
        .success()
        .stderr(predicate::str::contains("Successfully deleted client: 192.168.1.3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_profile_from_config_file_supplies_url_and_session() {
    let server = appliance().await;
    Mock::given(method("DELETE"))
        .and(path("/api/clients/192.168.1.3"))
        .and(header("X-FTL-SID", "s3cr3t"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join("clientele");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "default_profile = \"lab\"\n\n[profiles.lab]\nurl = \"{}\"\nsession_id_env = \"LAB_PIHOLE_SID\"\n",
            server.uri()
        ),
    )
    .unwrap();

    clientele_cmd()
        .env("XDG_CONFIG_HOME", home.path())
        .env("LAB_PIHOLE_SID", "s3cr3t")
        .args(["clients", "delete", "192.168.1.3", "--yes"])
        .assert()
        .success();
}
