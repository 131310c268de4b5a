#![allow(clippy::unwrap_used)]
// Integration tests for `RouterOsClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use uisync_api::{Error, RouterOsClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RouterOsClient) {
    let server = MockServer::start().await;
    let client = RouterOsClient::new(
        &server.uri(),
        "admin",
        "password".to_string().into(),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

const LIST_PATH: &str = "/rest/ip/firewall/address-list";

fn rows() -> serde_json::Value {
    json!([
        { ".id": "*1", "list": "clients_active", "address": "192.168.1.10", "comment": "John Doe" },
        { ".id": "*2", "list": "clients_active", "address": "192.168.1.20" },
        { ".id": "*3", "list": "clients_suspended", "address": "192.168.1.30", "comment": "Bob Johnson" }
    ])
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_base_url_gets_rest_prefix() {
    let (server, client) = setup().await;
    assert_eq!(client.base_url().as_str(), format!("{}/rest/", server.uri()));
}

#[tokio::test]
async fn test_get_address_list_all() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(basic_auth("admin", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows()))
        .mount(&server)
        .await;

    let items = client.get_address_list(None).await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, "*1");
    assert_eq!(items[0].comment, "John Doe");
    assert_eq!(items[1].comment, "");
    assert_eq!(items[2].list, "clients_suspended");
}

#[tokio::test]
async fn test_get_address_list_filters_by_list() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("list", "clients_suspended"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { ".id": "*3", "list": "clients_suspended", "address": "192.168.1.30" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let items = client
        .get_address_list(Some("clients_suspended"))
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].address, "192.168.1.30");
}

#[tokio::test]
async fn test_find_address_list_items() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("list", "clients_active"))
        .and(query_param("address", "192.168.1.10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { ".id": "*1", "list": "clients_active", "address": "192.168.1.10" }
        ])))
        .mount(&server)
        .await;

    let items = client
        .find_address_list_items("clients_active", "192.168.1.10")
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "*1");
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_address_to_list() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(LIST_PATH))
        .and(body_json(json!({
            "list": "clients_active",
            "address": "192.168.1.40",
            "comment": "Jane Smith - 2_102"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            ".id": "*9",
            "list": "clients_active",
            "address": "192.168.1.40",
            "comment": "Jane Smith - 2_102"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .add_address_to_list("192.168.1.40", "clients_active", "Jane Smith - 2_102")
        .await
        .unwrap();

    assert_eq!(created.id, "*9");
}

#[tokio::test]
async fn test_remove_address_from_list() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{LIST_PATH}/*1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.remove_address_from_list("*1").await.unwrap();
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_address_list(None).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_routeros_error_detail_is_surfaced() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(LIST_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": 400,
            "message": "Bad Request",
            "detail": "failure: already have such entry"
        })))
        .mount(&server)
        .await;

    let result = client
        .add_address_to_list("192.168.1.10", "clients_active", "")
        .await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 400);
            assert!(
                message.contains("already have such entry"),
                "expected RouterOS detail in message, got: {message}"
            );
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.get_address_list(None).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 503, .. }));
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.get_address_list(None).await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}
