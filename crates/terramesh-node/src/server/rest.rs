//! REST API endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use terramesh_relay::LocalContent;

use super::AppState;

/// Body of a POST /send request
#[derive(Deserialize)]
pub struct SendRequest {
    /// Chat text to inject into the mesh
    pub message: String,
}

/// Inject a chat message into the mesh.
///
/// The bridge stamps the id and origin; the HTTP client only supplies
/// text. Returns 503 when the bridge has shut down.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendRequest>,
) -> (StatusCode, &'static str) {
    debug!(len = req.message.len(), "chat message via /send");

    let content = LocalContent::Chat {
        sender_name: Some(state.node_name.clone()),
        text: req.message,
    };
    match state.bridge.send_local(content).await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            warn!("failed to hand message to bridge: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "relay unavailable")
        }
    }
}

/// Relay statistics
#[derive(Serialize)]
pub struct StatsResponse {
    pub accepted: u64,
    pub duplicates_dropped: u64,
    pub decode_failures: u64,
    pub local_originated: u64,
    pub send_errors: u64,
    pub uptime_seconds: u64,
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, StatusCode> {
    let stats = state
        .bridge
        .stats()
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;
    Ok(Json(StatsResponse {
        accepted: stats.accepted,
        duplicates_dropped: stats.duplicates_dropped,
        decode_failures: stats.decode_failures,
        local_originated: stats.local_originated,
        send_errors: stats.send_errors,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    }))
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Node info endpoint
#[derive(Serialize)]
pub struct NodeInfo {
    pub version: &'static str,
    pub node_id: String,
    pub name: String,
    pub uptime_seconds: u64,
}

pub async fn node_info(State(state): State<Arc<AppState>>) -> Json<NodeInfo> {
    Json(NodeInfo {
        version: env!("CARGO_PKG_VERSION"),
        node_id: state.node_id.to_string(),
        name: state.node_name.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
