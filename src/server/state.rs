use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::mcp::McpState;

use super::sessions::SessionRegistry;
use super::ServerConfig;

pub type GuardedMcpState = Arc<McpState>;
pub type GuardedSessionRegistry = Arc<SessionRegistry>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub mcp_state: GuardedMcpState,
    pub sessions: GuardedSessionRegistry,
    /// Cancelled on shutdown to end every open event stream.
    pub shutdown: CancellationToken,
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedMcpState {
    fn from_ref(input: &ServerState) -> Self {
        input.mcp_state.clone()
    }
}

impl FromRef<ServerState> for GuardedSessionRegistry {
    fn from_ref(input: &ServerState) -> Self {
        input.sessions.clone()
    }
}
