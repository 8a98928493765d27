#![allow(clippy::unwrap_used)]
// Integration tests for `ExcavatorClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rigwatch_api::{
    Error, ExcavatorClient, QUERY_ALGORITHMS, QUERY_DEVICES, QUERY_INFO, QUERY_WORKERS,
    TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ExcavatorClient) {
    let server = MockServer::start().await;
    let addr = server.address();
    // Bare host without a scheme: the client must add `http://` itself.
    let client =
        ExcavatorClient::new(&addr.ip().to_string(), addr.port(), &TransportConfig::default())
            .unwrap();
    (server, client)
}

async fn mount_query(server: &MockServer, query: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("command", query))
        .respond_with(response)
        .mount(server)
        .await;
}

// ── Rig info ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rig_info() {
    let (server, client) = setup().await;

    let body = json!({
        "version": "1.7.5d",
        "build_platform": "Windows",
        "build_number": 7,
        "uptime": 3600,
        "cpu_load": 0.12,
        "ram_load": 0.4,
        "id": 1,
        "error": null
    });
    mount_query(&server, QUERY_INFO, ResponseTemplate::new(200).set_body_json(&body)).await;

    let info = client.rig_info().await.unwrap();

    assert_eq!(info["version"], "1.7.5d");
    assert_eq!(info["uptime"], 3600);
    assert!(client.test_connection().await);
}

#[tokio::test]
async fn test_connection_fails_on_server_error() {
    let (server, client) = setup().await;

    mount_query(&server, QUERY_INFO, ResponseTemplate::new(500).set_body_string("boom")).await;

    assert!(!client.test_connection().await);
    let err = client.rig_info().await.unwrap_err();
    assert!(
        matches!(err, Error::Status { status: 500, ref body } if body == "boom"),
        "expected Status error, got: {err:?}"
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_connection_refused() {
    // Port 9 (discard) on loopback is not expected to be listening.
    let client = ExcavatorClient::new("127.0.0.1", 9, &TransportConfig::default()).unwrap();

    let err = client.rig_info().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
}

// ── Collections ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_devices() {
    let (server, client) = setup().await;

    let body = json!({
        "devices": [
            { "device_id": 0, "name": "RTX 3080", "uuid": "abc", "gpu_temp": 65 },
            { "device_id": 1, "name": "RTX 3070", "uuid": "def" }
        ],
        "id": 1,
        "error": null
    });
    mount_query(&server, QUERY_DEVICES, ResponseTemplate::new(200).set_body_json(&body)).await;

    let devices = client.devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0]["name"], "RTX 3080");
    assert_eq!(devices[1]["device_id"], 1);
}

#[tokio::test]
async fn test_algorithms_and_workers() {
    let (server, client) = setup().await;

    let algorithms = json!({
        "algorithms": [{ "algorithm_id": 20, "name": "daggerhashimoto", "speed": 9.5e7 }]
    });
    let workers = json!({
        "workers": [{
            "worker_id": 0,
            "device_id": 0,
            "device_uuid": "abc",
            "algorithms": [{ "id": 20, "name": "daggerhashimoto", "speed": 9.5e7 }]
        }]
    });
    mount_query(&server, QUERY_ALGORITHMS, ResponseTemplate::new(200).set_body_json(&algorithms))
        .await;
    mount_query(&server, QUERY_WORKERS, ResponseTemplate::new(200).set_body_json(&workers)).await;

    let algorithms = client.algorithms().await.unwrap();
    let workers = client.workers().await.unwrap();

    assert_eq!(algorithms[0]["algorithm_id"], 20);
    assert_eq!(workers[0]["algorithms"][0]["id"], 20);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_top_level_key() {
    let (server, client) = setup().await;

    mount_query(
        &server,
        QUERY_DEVICES,
        ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "error": null })),
    )
    .await;

    let err = client.devices().await.unwrap_err();
    assert!(matches!(err, Error::MissingKey { key: "devices" }), "got: {err:?}");
}

#[tokio::test]
async fn test_malformed_json() {
    let (server, client) = setup().await;

    mount_query(
        &server,
        QUERY_WORKERS,
        ResponseTemplate::new(200).set_body_string("{\"workers\": ["),
    )
    .await;

    let err = client.workers().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_rpc_error_member() {
    let (server, client) = setup().await;

    mount_query(
        &server,
        QUERY_ALGORITHMS,
        ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "error": "Internal error" })),
    )
    .await;

    let err = client.algorithms().await.unwrap_err();
    match err {
        Error::Rpc { ref message } => assert_eq!(message, "Internal error"),
        other => panic!("expected Rpc error, got: {other:?}"),
    }
}
