//! Integration tests for the graphapi HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use graphapi::api::{
    ApisResponse, AppState, HealthResponse, RpcResponse, StatusResponse, create_router,
};
use graphapi::config::ServerConfig;
use graphapi_core::{AddNodeRequest, EngineConfig, GraphEngine, StatusCode};
use serde_json::{Value, json};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Server config without rate limiting or auth.
fn open_config() -> ServerConfig {
    ServerConfig {
        rate_limit: 0,
        ..ServerConfig::default()
    }
}

fn server_with(engine: GraphEngine, config: &ServerConfig) -> TestServer {
    TestServer::new(create_router(AppState::new(engine), config)).unwrap()
}

/// Create a test server with a fresh engine.
fn create_test_server() -> TestServer {
    server_with(GraphEngine::new(), &open_config())
}

/// Create a test server with three nodes already stored.
fn create_populated_test_server() -> TestServer {
    let engine = GraphEngine::new();
    for name in ["Alice", "Bob", "Carol"] {
        assert!(engine.add_node(AddNodeRequest::new(name, 1_700_000_000)).is_ok());
    }
    server_with(engine, &open_config())
}

fn create_auth_test_server(api_key: &str) -> TestServer {
    let config = ServerConfig {
        api_key: Some(api_key.to_string()),
        ..open_config()
    };
    server_with(GraphEngine::new(), &config)
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// STATUS / APIS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_status_empty_store() {
    let server = create_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.node_count, 0);
}

#[tokio::test]
async fn test_status_populated_store() {
    let server = create_populated_test_server();

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.node_count, 3);
}

#[tokio::test]
async fn test_apis_lists_operations() {
    let server = create_test_server();

    let response = server.get("/apis").await;

    response.assert_status_ok();
    let apis: ApisResponse = response.json();
    assert_eq!(apis.version, 1);
    assert_eq!(
        apis.names(),
        ["addNode", "deleteNode", "clearGraph", "getNode", "listNodes", "nodeCount"]
    );
    assert_eq!(apis.apis[1].resp, "boolean");
}

// =============================================================================
// RPC ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_rpc_reference_scenario() {
    let server = create_test_server();

    let response = server
        .post("/rpc/addNode")
        .json(&json!({ "ui_name": "Test Node", "timestamp": 1_760_000_000 }))
        .await;
    response.assert_status_ok();
    let added: RpcResponse = response.json();
    assert!(added.is_ok());
    let node_id = added.into_data().unwrap();
    assert!(node_id.as_str().is_some_and(|id| !id.is_empty()));

    let first: Value = server.post("/rpc/deleteNode").json(&node_id).await.json();
    assert_eq!(
        first,
        json!({ "ok": true, "status": { "code": "OK", "message": "ok" }, "data": true })
    );

    let second: Value = server.post("/rpc/deleteNode").json(&node_id).await.json();
    assert_eq!(second["ok"], json!(true));
    assert_eq!(second["data"], json!(false));

    let cleared: Value = server.post("/rpc/clearGraph").json(&json!({})).await.json();
    assert_eq!(cleared["ok"], json!(true));
    assert_eq!(cleared["data"], json!({}));
}

#[tokio::test]
async fn test_rpc_ids_are_not_reused_after_clear() {
    let server = create_test_server();
    let body = json!({ "ui_name": "n", "timestamp": 0 });

    let first: RpcResponse = server.post("/rpc/addNode").json(&body).await.json();
    server.post("/rpc/clearGraph").json(&json!({})).await.assert_status_ok();
    let second: RpcResponse = server.post("/rpc/addNode").json(&body).await.json();

    assert_ne!(first.into_data(), second.into_data());
}

#[tokio::test]
async fn test_rpc_list_and_get() {
    let server = create_populated_test_server();

    let listed: RpcResponse = server.post("/rpc/listNodes").json(&json!({})).await.json();
    let nodes = listed.into_data().unwrap();
    assert_eq!(nodes.as_array().map(Vec::len), Some(3));
    assert_eq!(nodes[0]["ui_name"], json!("Alice"));

    let got: RpcResponse = server.post("/rpc/getNode").json(&json!("node_1001")).await.json();
    assert_eq!(got.into_data().unwrap()["ui_name"], json!("Bob"));
}

#[tokio::test]
async fn test_rpc_get_missing_node_is_404() {
    let server = create_test_server();

    let response = server.post("/rpc/getNode").json(&json!("node_1000")).await;

    response.assert_status_not_found();
    let envelope: RpcResponse = response.json();
    assert_eq!(envelope.status().code(), StatusCode::NotFound);
}

#[tokio::test]
async fn test_rpc_missing_fields_is_400() {
    let server = create_test_server();

    let response = server
        .post("/rpc/addNode")
        .json(&json!({ "ui_name": "no timestamp" }))
        .await;

    response.assert_status_bad_request();
    let envelope: Value = response.json();
    assert_eq!(envelope["ok"], json!(false));
    assert_eq!(envelope["status"]["code"], json!("INVALID_ARGUMENT"));
    assert!(envelope.get("data").is_none());
}

#[tokio::test]
async fn test_rpc_malformed_json_is_400_envelope() {
    let server = create_test_server();

    let response = server.post("/rpc/addNode").text("{not json").await;

    response.assert_status_bad_request();
    let envelope: RpcResponse = response.json();
    assert!(!envelope.is_ok());
    assert_eq!(envelope.status().code(), StatusCode::InvalidArgument);
}

#[tokio::test]
async fn test_rpc_unknown_method_is_404() {
    let server = create_test_server();

    let response = server.post("/rpc/addEdge").json(&json!({})).await;

    response.assert_status_not_found();
    let envelope: RpcResponse = response.json();
    assert_eq!(envelope.status().code(), StatusCode::Unimplemented);
}

#[tokio::test]
async fn test_rpc_exhausted_ids_is_503() {
    let engine = GraphEngine::with_config(EngineConfig {
        id_start: u64::MAX,
        ..EngineConfig::default()
    })
    .unwrap();
    let server = server_with(engine, &open_config());
    let body = json!({ "ui_name": "n", "timestamp": 0 });

    server.post("/rpc/addNode").json(&body).await.assert_status_ok();
    let response = server.post("/rpc/addNode").json(&body).await;

    assert_eq!(response.status_code(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.node_count, 1);
}

#[tokio::test]
async fn test_rpc_empty_body_is_null_argument() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let router = create_router(AppState::new(GraphEngine::new()), &open_config());
    let request = Request::builder()
        .method("POST")
        .uri("/rpc/clearGraph")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let envelope: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(envelope["data"], json!({}));
}

/// Send one raw request through the router and decode the envelope body.
async fn oneshot_envelope(
    uri: &str,
    body: axum::body::Body,
) -> (axum::http::StatusCode, RpcResponse) {
    use axum::http::Request;
    use tower::ServiceExt;

    let router = create_router(AppState::new(GraphEngine::new()), &open_config());
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(body)
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_rpc_oversized_body_is_413_envelope() {
    let name = "x".repeat(3 * 1024 * 1024);
    let body = serde_json::to_vec(&json!({ "ui_name": name, "timestamp": 0 })).unwrap();

    let (status, envelope) = oneshot_envelope("/rpc/addNode", body.into()).await;

    assert_eq!(status, axum::http::StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!envelope.is_ok());
    assert_eq!(envelope.status().code(), StatusCode::InvalidArgument);
}

#[tokio::test]
async fn test_rpc_non_utf8_method_is_400_envelope() {
    let (status, envelope) = oneshot_envelope("/rpc/%FF", axum::body::Body::empty()).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert!(!envelope.is_ok());
    assert_eq!(envelope.status().code(), StatusCode::InvalidArgument);
}

#[tokio::test]
async fn test_rpc_envelopes_decode_on_success_and_failure() {
    let server = create_test_server();

    // getNode on a missing id: failure envelopes decode with no data.
    let missing: RpcResponse = server.post("/rpc/getNode").json(&json!("node_9")).await.json();
    assert!(missing.into_result().is_err());

    let count: RpcResponse = server.post("/rpc/nodeCount").await.json();
    assert_eq!(count.into_result().unwrap(), json!(0));
}

// =============================================================================
// AUTHENTICATION TESTS
// =============================================================================

#[tokio::test]
async fn test_auth_valid_bearer_token() {
    let api_key = "test-secret-key-12345";
    let server = create_auth_test_server(api_key);

    let response = server
        .get("/status")
        .add_header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", api_key)
                .parse::<HeaderValue>()
                .unwrap(),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_valid_raw_token() {
    let api_key = "test-raw-key-67890";
    let server = create_auth_test_server(api_key);

    let response = server
        .post("/rpc/nodeCount")
        .add_header(
            axum::http::header::AUTHORIZATION,
            api_key.parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_invalid_token_rejected() {
    let server = create_auth_test_server("correct-key");

    let response = server
        .post("/rpc/clearGraph")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer wrong-key".parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_auth_missing_header_rejected() {
    let server = create_auth_test_server("correct-key");

    server.get("/apis").await.assert_status_unauthorized();
}

#[tokio::test]
async fn test_auth_health_always_open() {
    let server = create_auth_test_server("correct-key");

    server.get("/health").await.assert_status_ok();
}

// =============================================================================
// RATE LIMIT TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_burst() {
    let config = ServerConfig {
        rate_limit: 1,
        ..ServerConfig::default()
    };
    let server = server_with(GraphEngine::new(), &config);

    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;
    assert_eq!(
        response.status_code(),
        axum::http::StatusCode::TOO_MANY_REQUESTS
    );
}
