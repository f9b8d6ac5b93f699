//! SSE streaming endpoint.
//!
//! GET /api/streams/:topic
//!
//! Topics: `scrape_job:{job_id}` or `supplier_imports:{supplier_id}`.
//! Emits `connected` once, then one event per published message (named by
//! its `type` field), and `lagged` when this subscriber fell behind.

use std::convert::Infallible;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::server::app::AppState;

const TOPIC_PREFIXES: &[&str] = &["scrape_job:", "supplier_imports:"];

pub async fn stream_handler(
    Extension(state): Extension<AppState>,
    Path(topic): Path<String>,
) -> Result<Sse<impl futures::Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    validate_topic(&topic).map_err(|_| StatusCode::BAD_REQUEST)?;

    let rx = state.deps.stream_hub.subscribe(&topic).await;
    tracing::debug!(topic = %topic, "SSE subscriber connected");

    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let events = BroadcastStream::new(rx).filter_map(|result| async {
        match result {
            Ok(value) => {
                let event_name = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("message");
                Event::default()
                    .event(event_name)
                    .json_data(&value)
                    .ok()
                    .map(Ok)
            }
            Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
                Event::default()
                    .event("lagged")
                    .json_data(&serde_json::json!({"missed": n}))
                    .ok()
                    .map(Ok)
            }
        }
    });

    Ok(Sse::new(connected.chain(events)).keep_alive(KeepAlive::default()))
}

/// Known prefix followed by a UUID.
fn validate_topic(topic: &str) -> Result<(), anyhow::Error> {
    let id = TOPIC_PREFIXES
        .iter()
        .find_map(|prefix| topic.strip_prefix(prefix))
        .ok_or_else(|| anyhow::anyhow!("Unknown topic prefix: {}", topic))?;
    uuid::Uuid::parse_str(id)?;
    Ok(())
}
