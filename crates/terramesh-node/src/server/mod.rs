//! Sensor-node HTTP server
//!
//! A sensor node in the field exposes a small HTTP surface so rescue
//! crews on the same access point can read the mesh from a phone
//! browser: POST a chat message in, stream accepted traffic out.

pub mod events;
pub mod rest;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

use terramesh_core::NodeId;
use terramesh_relay::BridgeHandle;

/// State shared across handlers
pub struct AppState {
    /// Handle into the relay bridge
    pub bridge: BridgeHandle,
    /// Node start time, the clock behind SSE event ids
    pub start_time: Instant,
    /// This node's mesh identity
    pub node_id: NodeId,
    /// Display name for this node
    pub node_name: String,
}

/// Create the server router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(rest::health))
        // Node info
        .route("/api/info", get(rest::node_info))
        // Relay stats
        .route("/api/stats", get(rest::get_stats))
        // Inject a chat message into the mesh
        .route("/send", post(rest::send_message))
        // Live stream of accepted mesh traffic
        .route("/events", get(events::sse_handler))
        // CORS for browser clients on the field AP
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
