//! `GET /sse`: opens an MCP session.
//!
//! The first event is `endpoint`, naming the URL the client must post its
//! messages to. JSON-RPC responses follow as `message` events.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::mcp::{serve_session, McpResponse};

use super::sessions::{SessionGuard, SessionId, SessionTransport};
use super::state::ServerState;

pub const SSE_PATH: &str = "/sse";
pub const MESSAGES_PATH: &str = "/messages";

pub const ENDPOINT_EVENT: &str = "endpoint";
pub const MESSAGE_EVENT: &str = "message";

const INBOUND_QUEUE_SIZE: usize = 32;
const OUTBOUND_QUEUE_SIZE: usize = 32;

pub fn endpoint_url(id: &SessionId) -> String {
    format!("{}?sessionId={}", MESSAGES_PATH, id)
}

fn message_event(response: &McpResponse) -> Event {
    match serde_json::to_string(response) {
        Ok(json) => Event::default().event(MESSAGE_EVENT).data(json),
        Err(e) => {
            error!("Failed to serialize MCP response: {}", e);
            Event::default().comment("dropped unserializable response")
        }
    }
}

pub async fn sse_handler(
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let id = SessionId::generate();
    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE_SIZE);
    let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE_SIZE);

    state
        .sessions
        .register(&id, SessionTransport::new(inbound_tx));
    let guard = SessionGuard::new(state.sessions.clone(), id.clone());

    tokio::spawn(serve_session(
        state.mcp_state.clone(),
        id.to_string(),
        inbound_rx,
        outbound_tx,
    ));

    let endpoint = Event::default()
        .event(ENDPOINT_EVENT)
        .data(endpoint_url(&id));

    // The guard travels with the stream, so the session is unregistered
    // whenever axum drops it.
    let responses = stream::unfold((outbound_rx, guard), |(mut rx, guard)| async move {
        let response = rx.recv().await?;
        debug!("Session {} -> {:?}", guard.id(), response.id);
        Some((message_event(&response), (rx, guard)))
    });

    let events = stream::once(async move { endpoint })
        .chain(responses)
        .map(Ok)
        .take_until(state.shutdown.clone().cancelled_owned());

    Sse::new(events).keep_alive(
        KeepAlive::new().interval(Duration::from_secs(state.config.sse_keep_alive_sec)),
    )
}
