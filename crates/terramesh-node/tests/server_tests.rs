//! HTTP surface contract tests
//!
//! These tests pin the request and response shapes the browser clients
//! depend on, and the wire frames the SSE feed carries.

use serde_json::{json, Value};

/// Expected body for POST /send
#[test]
fn test_send_request_format() {
    let request = json!({
        "message": "anyone near the north ridge?"
    });

    assert!(request["message"].is_string());

    // The browser sends nothing else; id and origin are stamped by the node
    assert!(request.get("uuid").is_none());
    assert!(request.get("from_node").is_none());
}

/// Expected format for GET /api/info response
#[test]
fn test_info_response_format() {
    let response = json!({
        "version": "0.1.0",
        "node_id": "node-3f1a",
        "name": "Admin",
        "uptime_seconds": 42
    });

    assert!(response["version"].is_string());
    assert!(response["node_id"].is_string());
    assert!(response["name"].is_string());
    assert!(response["uptime_seconds"].is_number());
}

/// Expected format for GET /api/stats response
#[test]
fn test_stats_response_format() {
    let response = json!({
        "accepted": 12,
        "duplicates_dropped": 7,
        "decode_failures": 0,
        "local_originated": 3,
        "send_errors": 0,
        "uptime_seconds": 3600
    });

    for field in [
        "accepted",
        "duplicates_dropped",
        "decode_failures",
        "local_originated",
        "send_errors",
        "uptime_seconds",
    ] {
        assert!(response[field].is_number(), "missing {}", field);
    }
}

/// A chat frame as it appears in the SSE data field
#[test]
fn test_sse_chat_frame_shape() {
    let data = r#"{"uuid":"7f9c24e8-3b12-4c56-9d01-2a34b56c78d9","from_node":"node-3f1a","username":"Admin","message":"water low"}"#;
    let frame: Value = serde_json::from_str(data).unwrap();

    assert!(frame["uuid"].is_string());
    assert!(frame["from_node"].is_string());
    assert!(frame["message"].is_string());
    assert!(frame.get("type").is_none());
}

/// A sensor frame as it appears in the SSE data field
#[test]
fn test_sse_sensor_frame_shape() {
    let data = r#"{"uuid":"7f9c24e8-3b12-4c56-9d01-2a34b56c78d9","from_node":"node-3f1a","type":"sensors","moisture":41.5,"pressure":1012.8}"#;
    let frame: Value = serde_json::from_str(data).unwrap();

    assert_eq!(frame["type"], "sensors");
    assert!(frame["moisture"].is_number());
    assert!(frame["pressure"].is_number());
    assert!(frame.get("message").is_none());
}
