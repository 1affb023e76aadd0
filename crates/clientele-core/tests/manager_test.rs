#![allow(clippy::unwrap_used)]
// Flow tests for `ClientManager` against a wiremock appliance.

use std::time::Duration;

use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{any, body_string, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clientele_core::{
    ClientManager, ClientRecord, CoreError, DeleteEvent, EditIntent, IdentityKey, ManagerConfig,
    NoticeLevel,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ClientManager) {
    let server = MockServer::start().await;
    let config = ManagerConfig::new(Url::parse(&server.uri()).unwrap());
    let manager = ClientManager::new(&config).unwrap();
    (server, manager)
}

fn client_json(id: i64, client: &str) -> serde_json::Value {
    json!({
        "id": id,
        "client": client,
        "name": null,
        "comment": null,
        "groups": [0],
        "date_added": 1_700_000_000,
        "date_modified": 1_700_000_000
    })
}

/// Mount the reads a reload performs, each expected `times` times.
async fn mount_reload(server: &MockServer, clients: serde_json::Value, times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "groups": [{ "id": 0, "name": "Default", "enabled": true, "comment": null }]
        })))
        .expect(times)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "clients": clients })))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_counter(server: &MockServer, clients: u64, times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/info/ftl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ftl": { "database": { "gravity": 1000, "groups": 1, "lists": 1, "clients": clients } }
        })))
        .expect(times)
        .mount(server)
        .await;
}

fn record(id: i64, client: &str, comment: Option<&str>, groups: Vec<i64>) -> ClientRecord {
    ClientRecord {
        id,
        client: client.into(),
        name: None,
        comment: comment.map(Into::into),
        groups,
        date_added: Utc::now(),
        date_modified: Utc::now(),
    }
}

// ── Add ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_posts_form_then_refetches_suggestions_grid_and_counter() {
    let (server, manager) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .and(body_string("client=192.168.1.5&comment=test"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients/_suggestions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "clients": [] })))
        .expect(1)
        .mount(&server)
        .await;
    mount_reload(&server, json!([client_json(1, "192.168.1.5")]), 1).await;
    mount_counter(&server, 1, 1).await;

    let outcome = manager.add("192.168.1.5", "test").await.unwrap();

    assert_eq!(outcome.client, "192.168.1.5");
    assert_eq!(outcome.notice.title, "Successfully added client");
    assert_eq!(outcome.suggestions.len(), 1);
    assert!(outcome.suggestions[0].is_blank());
    assert_eq!(outcome.reload.snapshot.unwrap().clients.len(), 1);
    assert_eq!(outcome.reload.client_count, Some(1));
}

#[tokio::test]
async fn test_add_uppercases_mac_and_escapes_comment() {
    let (server, manager) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .and(body_string(
            "client=AA%3ABB%3ACC%3ADD%3AEE%3AFF&comment=a+%26lt%3Bb%26gt%3B",
        ))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = manager.add(" aa:bb:cc:dd:ee:ff ", "a <b>").await.unwrap();
    assert_eq!(outcome.client, "AA:BB:CC:DD:EE:FF");
    assert!(outcome.reload.snapshot.is_none());
}

#[tokio::test]
async fn test_invalid_input_sends_nothing() {
    let (server, manager) = setup().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for input in ["", "   ", "not a host", "<script>", "10.0.0.0/40"] {
        let result = manager.add(input, "").await;
        assert!(
            matches!(result, Err(CoreError::Validation { .. })),
            "expected validation error for {input:?}, got: {result:?}"
        );
    }
}

#[tokio::test]
async fn test_add_failure_surfaces_server_text_without_reload() {
    let (server, manager) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Client already exists"))
        .expect(1)
        .mount(&server)
        .await;
    mount_reload(&server, json!([]), 0).await;

    let err = manager.add("10.0.0.1", "").await.unwrap_err();
    assert_eq!(err.detail(), "Client already exists");
}

// ── Suggestions ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_suggestion_failure_degrades_to_blank_option() {
    let (server, manager) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients/_suggestions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let options = manager.suggestions().await;
    assert_eq!(options.len(), 1);
    assert!(options[0].is_blank());
}

// ── Edit ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_group_edit_sends_full_record() {
    let (server, manager) = setup().await;
    let row = record(4, "10.0.0.0/8", Some("Tom &amp; Jerry"), vec![0]);

    Mock::given(method("PUT"))
        .and(path("/api/clients/10.0.0.0%2F8"))
        .and(body_string(
            "client=31302e302e302e302f38\
             &groups%5B%5D=1&groups%5B%5D=3\
             &comment=Tom+%26amp%3B+Jerry\
             &enabled=false",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    mount_reload(&server, json!([client_json(4, "10.0.0.0/8")]), 1).await;
    mount_counter(&server, 1, 0).await;

    let outcome = manager
        .edit(&row, &EditIntent::Groups(vec![1, 3]))
        .await
        .unwrap();

    assert_eq!(outcome.notice.title, "Successfully edited groups of client");
    assert_eq!(outcome.notice.detail.as_deref(), Some("10.0.0.0/8"));
    assert!(outcome.reload.snapshot.is_some());
}

#[tokio::test]
async fn test_comment_edit_keeps_groups() {
    let (server, manager) = setup().await;
    let row = record(2, "laptop", None, vec![0, 5]);

    Mock::given(method("PUT"))
        .and(path("/api/clients/laptop"))
        .and(body_string_contains("groups%5B%5D=0&groups%5B%5D=5"))
        .and(body_string_contains("comment=office"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_reload(&server, json!([]), 1).await;

    manager
        .edit(&row, &EditIntent::Comment("office".into()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_edit_failure_has_contextual_notice() {
    let (server, manager) = setup().await;
    let row = record(2, "laptop", None, vec![0]);

    Mock::given(method("PUT"))
        .and(path("/api/clients/laptop"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid group"))
        .mount(&server)
        .await;

    let intent = EditIntent::Comment("x".into());
    let err = manager.edit(&row, &intent).await.unwrap_err();
    let notice = intent.failure_notice(&row.client, &err);

    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.title, "Error while editing comment of client laptop");
    assert_eq!(notice.detail.as_deref(), Some("Invalid group"));
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_batch_delete_runs_in_list_order() {
    let (server, manager) = setup().await;

    for client in ["10.0.0.2", "10.0.0.1", "AA:BB:CC:DD:EE:FF"] {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/clients/{client}")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }
    mount_reload(&server, json!([]), 1).await;
    mount_counter(&server, 0, 1).await;

    let keys: Vec<IdentityKey> = ["10.0.0.2", "10.0.0.1", "AA:BB:CC:DD:EE:FF"]
        .iter()
        .map(|c| IdentityKey::encode(c))
        .collect();
    let mut removed = Vec::new();
    let report = manager
        .delete_batch(&keys, |event| {
            if let DeleteEvent::Deleted { client, .. } = event {
                removed.push(client);
            }
        })
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.deleted, vec!["10.0.0.2", "10.0.0.1", "AA:BB:CC:DD:EE:FF"]);
    assert_eq!(removed, report.deleted);
    assert_eq!(report.reload.client_count, Some(0));

    let order: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "DELETE")
        .map(|r| r.url.path().to_owned())
        .collect();
    assert_eq!(
        order,
        vec![
            "/api/clients/10.0.0.2",
            "/api/clients/10.0.0.1",
            "/api/clients/AA:BB:CC:DD:EE:FF"
        ]
    );
}

#[tokio::test]
async fn test_batch_delete_stops_at_first_failure() {
    let (server, manager) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/clients/10.0.0.1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is locked"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/clients/10.0.0.2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    mount_reload(
        &server,
        json!([client_json(1, "10.0.0.1"), client_json(2, "10.0.0.2")]),
        1,
    )
    .await;
    mount_counter(&server, 2, 1).await;

    let keys = vec![IdentityKey::encode("10.0.0.1"), IdentityKey::encode("10.0.0.2")];
    let mut events = Vec::new();
    let report = manager
        .delete_batch(&keys, |event| events.push(event))
        .await
        .unwrap();

    assert!(report.deleted.is_empty());
    assert_eq!(
        events,
        vec![DeleteEvent::Deleting {
            client: "10.0.0.1".into()
        }]
    );

    let failure = report.failure.as_ref().unwrap();
    assert_eq!(failure.client, "10.0.0.1");
    assert_eq!(failure.not_attempted, vec!["10.0.0.2"]);

    let notice = failure.notice();
    assert_eq!(notice.title, "Error while deleting client(s): 10.0.0.1, 10.0.0.2");
    assert_eq!(notice.detail.as_deref(), Some("database is locked"));

    // Row A is still there after the reconciling reload.
    let snapshot = report.reload.snapshot.unwrap();
    assert!(snapshot.clients.iter().any(|c| c.client == "10.0.0.1"));
}

#[tokio::test]
async fn test_undecodable_key_is_a_failure_without_request() {
    let (server, manager) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    mount_reload(&server, json!([]), 1).await;
    mount_counter(&server, 0, 1).await;

    let keys = vec![IdentityKey::from_encoded("zz"), IdentityKey::encode("10.0.0.9")];
    let report = manager.delete_batch(&keys, |_| {}).await.unwrap();

    let failure = report.failure.unwrap();
    assert_eq!(failure.client, "zz");
    assert!(matches!(failure.error, CoreError::InvalidIdentityKey { .. }));
    assert_eq!(failure.not_attempted, vec!["10.0.0.9"]);
}

// ── Concurrency ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_concurrent_mutation_is_busy() {
    let (server, manager) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let background = manager.clone();
    let add = tokio::spawn(async move { background.add("10.0.0.5", "").await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(manager.is_busy());
    let result = manager
        .delete_batch(&[IdentityKey::encode("10.0.0.1")], |_| {})
        .await;
    assert!(matches!(result, Err(CoreError::Busy)));

    assert!(add.await.unwrap().is_ok());
    assert!(!manager.is_busy());
}
