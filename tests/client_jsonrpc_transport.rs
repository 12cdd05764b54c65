//! Tests for `JsonRpcTransport` construction and the `JsonRpcRequest`/
//! `JsonRpcResponse` envelope it carries.
//!
//! HTTP round-trips against a live server live in
//! `client_server_integration.rs`; this file covers construction and
//! (de)serialization in isolation.

use a2a_rs::client::{JsonRpcTransport, TransportConfig};
use a2a_rs::types::{JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
use serde_json::json;
use std::time::Duration;

// ============================================================================
// Construction
// ============================================================================

#[test]
fn transport_new_stores_url() {
    let transport = JsonRpcTransport::new("http://localhost:7420/a2a");
    assert_eq!(transport.url(), "http://localhost:7420/a2a");
}

#[test]
fn transport_with_config_stores_url() {
    let config = TransportConfig {
        timeout: Duration::from_secs(5),
        headers: Default::default(),
    };
    let transport = JsonRpcTransport::with_config("http://localhost:7420/a2a", config);
    assert_eq!(transport.url(), "http://localhost:7420/a2a");
}

#[test]
fn transport_with_client_stores_url() {
    let client = reqwest::Client::new();
    let transport = JsonRpcTransport::with_client("http://localhost:7420/a2a", client);
    assert_eq!(transport.url(), "http://localhost:7420/a2a");
}

#[test]
fn transport_with_timeout_is_builder_style() {
    let transport = JsonRpcTransport::new("http://localhost:7420/a2a")
        .with_timeout(Duration::from_secs(10));
    assert_eq!(transport.url(), "http://localhost:7420/a2a");
}

#[test]
fn transport_with_header_is_builder_style() {
    let transport =
        JsonRpcTransport::new("http://localhost:7420/a2a").with_header("X-Api-Key", "secret");
    assert_eq!(transport.url(), "http://localhost:7420/a2a");
}

#[test]
fn transport_debug_and_clone() {
    let transport = JsonRpcTransport::new("http://localhost:7420/a2a");
    let cloned = transport.clone();
    assert_eq!(transport.url(), cloned.url());
    let _ = format!("{:?}", transport);
}

// ============================================================================
// TransportConfig defaults
// ============================================================================

#[test]
fn transport_config_default_timeout_is_60s() {
    let config = TransportConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert!(config.headers.is_empty());
}

#[test]
fn transport_config_custom_timeout() {
    let config = TransportConfig {
        timeout: Duration::from_secs(5),
        headers: Default::default(),
    };
    assert_eq!(config.timeout, Duration::from_secs(5));
}

// ============================================================================
// JsonRpcRequest serialization
// ============================================================================

#[test]
fn json_rpc_request_serialization() {
    let request = JsonRpcRequest::new(
        "req-1",
        "tasks/send",
        Some(json!({ "id": "task-1", "sessionId": "session-1" })),
    );
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["jsonrpc"], "2.0");
    assert_eq!(value["id"], "req-1");
    assert_eq!(value["method"], "tasks/send");
    assert_eq!(value["params"]["id"], "task-1");
}

#[test]
fn json_rpc_request_with_numeric_id() {
    let request = JsonRpcRequest::new(7, "tasks/get", Some(json!({ "id": "task-1" })));
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["id"], 7);
}

#[test]
fn json_rpc_request_omits_params_when_none() {
    let request = JsonRpcRequest::new(1, "tasks/get", None);
    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("params").is_none());
}

#[test]
fn json_rpc_id_roundtrips_string_and_number() {
    let string_id: JsonRpcId = "abc".into();
    let number_id: JsonRpcId = 42i64.into();
    assert_eq!(string_id.to_string(), "abc");
    assert_eq!(number_id.to_string(), "42");

    let value = serde_json::to_value(&number_id).unwrap();
    assert_eq!(value, json!(42));
    let parsed: JsonRpcId = serde_json::from_value(json!("abc")).unwrap();
    assert_eq!(parsed, JsonRpcId::String("abc".to_string()));
}

// ============================================================================
// JsonRpcResponse deserialization
// ============================================================================

#[test]
fn json_rpc_response_with_result() {
    let raw = json!({
        "jsonrpc": "2.0",
        "id": "req-1",
        "result": { "id": "task-1", "status": { "state": "completed" } }
    });
    let response: JsonRpcResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(response.jsonrpc, "2.0");
    assert_eq!(response.id, JsonRpcId::String("req-1".to_string()));
    assert!(response.result.is_some());
    assert!(response.error.is_none());
    assert_eq!(response.result.unwrap()["status"]["state"], "completed");
}

#[test]
fn json_rpc_response_with_error() {
    let raw = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": { "code": -32000, "message": "task not found" }
    });
    let response: JsonRpcResponse = serde_json::from_value(raw).unwrap();
    assert!(response.result.is_none());
    let error = response.error.unwrap();
    assert_eq!(error.code, -32000);
    assert_eq!(error.message, "task not found");
    assert!(error.data.is_none());
}

#[test]
fn json_rpc_response_with_error_data() {
    let raw = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": {
            "code": -32602,
            "message": "invalid params",
            "data": { "field": "id" }
        }
    });
    let response: JsonRpcResponse = serde_json::from_value(raw).unwrap();
    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    assert_eq!(error.data.unwrap()["field"], "id");
}

#[test]
fn json_rpc_response_success_constructor() {
    let response = JsonRpcResponse::success(JsonRpcId::Number(1), json!({ "ok": true }));
    assert!(response.error.is_none());
    assert_eq!(response.result.unwrap()["ok"], true);
}

#[test]
fn json_rpc_response_error_constructor() {
    let error = JsonRpcError {
        code: -32601,
        message: "method not found".to_string(),
        data: None,
    };
    let response = JsonRpcResponse::error(JsonRpcId::Number(1), error);
    assert!(response.result.is_none());
    assert_eq!(response.error.unwrap().code, -32601);
}

// Skipped Python SDK tests (no equivalent surface in this SDK):
// - test_send_message_params_serialization / _with_configuration
//     `SendMessageParams`/`SendMessageConfiguration` don't exist here — a
//     `tasks/send` request carries a `Task`-shaped params object directly,
//     exercised end-to-end in client_server_integration.rs.
// - transport selection / REST / gRPC client construction — single
//     JSON-RPC transport only, see client_client_factory.rs.
