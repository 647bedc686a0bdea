//! `POST /messages`: client to server half of the SSE transport.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::mcp::discovery::{discover_response, is_discovery_request};

use super::sessions::TransportError;
use super::state::ServerState;

pub const NO_TRANSPORT_MESSAGE: &str = "No transport found for sessionId";

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

fn no_transport(session_id: Option<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": NO_TRANSPORT_MESSAGE,
            "sessionId": session_id,
        })),
    )
        .into_response()
}

fn bad_request(message: String, session_id: Option<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": message,
            "sessionId": session_id,
        })),
    )
        .into_response()
}

pub async fn post_message(
    State(state): State<ServerState>,
    Query(query): Query<MessagesQuery>,
    body: Bytes,
) -> Response {
    let session_id = query.session_id;
    debug!("POST /messages for sessionId: {:?}", session_id);

    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => return bad_request(format!("Invalid JSON body: {}", e), session_id),
    };

    if is_discovery_request(&body) {
        debug!("Answering discovery request");
        return Json(discover_response(&state.mcp_state.registry)).into_response();
    }

    let Some(transport) = session_id.as_deref().and_then(|id| state.sessions.lookup(id)) else {
        warn!("No transport found for sessionId: {:?}", session_id);
        return no_transport(session_id);
    };

    match transport.handle_post_message(body).await {
        Ok(()) => (StatusCode::ACCEPTED, "Accepted").into_response(),
        Err(TransportError::InvalidMessage(message)) => {
            debug!("Rejected message for {:?}: {}", session_id, message);
            bad_request(format!("Invalid message: {}", message), session_id)
        }
        Err(TransportError::Closed) => {
            warn!("Session {:?} worker has stopped", session_id);
            no_transport(session_id)
        }
    }
}
