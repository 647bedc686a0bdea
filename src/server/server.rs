use anyhow::{Context, Result};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::mcp::McpState;

use super::messages::post_message;
use super::sessions::SessionRegistry;
use super::sse::{sse_handler, MESSAGES_PATH, SSE_PATH};
use super::{cors_layer, log_requests, preflight_no_content, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub version: String,
    pub active_sessions: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        version: crate::SERVER_VERSION.to_string(),
        active_sessions: state.sessions.len(),
    };
    Json(stats)
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        mcp_state: Arc<McpState>,
        shutdown: CancellationToken,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            hash: env!("GIT_HASH").to_owned(),
            mcp_state,
            sessions: Arc::new(SessionRegistry::new()),
            shutdown,
        }
    }
}

/// Build the router. Cancelling `shutdown` ends every open event stream.
pub fn make_app(
    config: ServerConfig,
    mcp_state: Arc<McpState>,
    shutdown: CancellationToken,
) -> Router {
    let state = ServerState::new(config, mcp_state, shutdown);

    Router::new()
        .route("/", get(home))
        .route(SSE_PATH, get(sse_handler))
        .route(MESSAGES_PATH, post(post_message))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, log_requests))
        .layer(cors_layer())
        .layer(middleware::from_fn(preflight_no_content))
}

pub async fn run_server(config: ServerConfig, mcp_state: Arc<McpState>) -> Result<()> {
    let address = format!("{}:{}", config.bind_address, config.port);
    let shutdown = CancellationToken::new();
    let app = make_app(config, mcp_state, shutdown.clone());

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("MCP Server running on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received Ctrl+C, initiating graceful shutdown");
            shutdown.cancel();
        })
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");
    Ok(())
}
