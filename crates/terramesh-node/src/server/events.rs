//! Server-sent events stream of accepted mesh traffic
//!
//! Every frame the relay accepts off the air is pushed to connected
//! browsers verbatim as an SSE `message` event. Event ids are the node's
//! uptime in milliseconds, which is monotonic enough for a browser's
//! automatic reconnect and costs nothing to produce.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::AppState;

/// GET /events - subscribe to the live mesh feed
pub async fn sse_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("SSE client connected");
    let rx = state.bridge.subscribe_local_out();
    let start = state.start_time;

    let stream = stream::unfold(rx, move |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(raw) => {
                    let event = Event::default()
                        .event("message")
                        .id(uptime_millis(start))
                        .data(String::from_utf8_lossy(&raw).into_owned());
                    return Some((Ok(event), rx));
                }
                // Slow client: skip what it missed and keep streaming
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "SSE client lagged, frames skipped");
                    continue;
                }
                // Bridge is gone; end the stream so the client reconnects
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn uptime_millis(start: Instant) -> String {
    start.elapsed().as_millis().to_string()
}
