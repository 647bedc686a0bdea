//! MCP Session Handler
//!
//! Each SSE session gets one worker running [`serve_session`]. The worker
//! drains the session's inbound queue in order and pushes responses to the
//! outbound queue that feeds the event stream.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::context::ToolContext;
use super::protocol::{
    methods, InitializeParams, InitializeResult, ListChangedCapability, McpError, McpRequest,
    McpResponse, PingResult, PromptsGetParams, PromptsListResult, ResourcesCapability,
    ResourcesListResult, ServerCapabilities, ServerInfo, ToolsCallParams, ToolsListResult,
    MCP_PROTOCOL_VERSION,
};
use super::registry::McpRegistry;
use crate::tmdb::{AccessTokenSource, TmdbClient};

pub const SERVER_NAME: &str = "moviedb-mcp-server";

/// State shared across MCP sessions
pub struct McpState {
    pub registry: Arc<McpRegistry>,
    pub tmdb: Arc<TmdbClient>,
    pub token_source: Arc<dyn AccessTokenSource>,
}

impl McpState {
    /// Build the state with every tool and prompt registered.
    pub fn new(tmdb: TmdbClient, token_source: Arc<dyn AccessTokenSource>) -> Self {
        let mut registry = McpRegistry::new();
        super::tools::register_all_tools(&mut registry);
        super::prompts::register_all_prompts(&mut registry);

        info!(
            "MCP registry initialized with {} tools and {} prompts",
            registry.tool_count(),
            registry.prompt_count()
        );

        Self {
            registry: Arc::new(registry),
            tmdb: Arc::new(tmdb),
            token_source,
        }
    }

    fn tool_context(&self, session_id: &str) -> ToolContext {
        ToolContext {
            tmdb: self.tmdb.clone(),
            token_source: self.token_source.clone(),
            session_id: Some(session_id.to_string()),
        }
    }
}

/// Per-session protocol state.
#[derive(Debug, Default)]
pub struct SessionState {
    pub initialized: bool,
    pub client_name: Option<String>,
}

/// Process requests for one session until the inbound queue closes or the
/// outbound side goes away.
pub async fn serve_session(
    state: Arc<McpState>,
    session_id: String,
    mut inbound: mpsc::Receiver<McpRequest>,
    outbound: mpsc::Sender<McpResponse>,
) {
    debug!("MCP worker started for session {}", session_id);
    let mut session = SessionState::default();

    while let Some(request) = inbound.recv().await {
        let Some(response) = handle_request(&state, &session_id, &mut session, request).await
        else {
            continue;
        };
        if outbound.send(response).await.is_err() {
            debug!("Event stream for session {} is gone", session_id);
            break;
        }
    }

    debug!("MCP worker finished for session {}", session_id);
}

/// Handle a single MCP request. Notifications never produce a response.
pub async fn handle_request(
    state: &McpState,
    session_id: &str,
    session: &mut SessionState,
    request: McpRequest,
) -> Option<McpResponse> {
    debug!(
        "Session {} <- {} (id {:?})",
        session_id, request.method, request.id
    );

    if request.is_notification() {
        match request.method.as_str() {
            methods::INITIALIZED | methods::CANCELLED => {}
            other => debug!("Ignoring notification {}", other),
        }
        return None;
    }

    let request_id = request.id.clone();

    let result = match request.method.as_str() {
        methods::INITIALIZE => handle_initialize(&request, session),
        methods::PING => to_value(PingResult {}),
        methods::SHUTDOWN => {
            session.initialized = false;
            to_value(PingResult {})
        }
        _ if !session.initialized => Err(McpError::InvalidRequest("Not initialized".to_string())),
        methods::TOOLS_LIST => to_value(ToolsListResult {
            tools: state.registry.tool_definitions(),
        }),
        methods::TOOLS_CALL => handle_tools_call(&request, state, session_id).await,
        methods::PROMPTS_LIST => to_value(PromptsListResult {
            prompts: state.registry.prompt_definitions(),
        }),
        methods::PROMPTS_GET => handle_prompts_get(&request, state),
        methods::RESOURCES_LIST => to_value(ResourcesListResult {
            resources: Vec::new(),
        }),
        other => Err(McpError::MethodNotFound(other.to_string())),
    };

    Some(match result {
        Ok(value) => McpResponse::success(request_id, value),
        Err(error) => {
            debug!("Session {} request failed: {}", session_id, error);
            McpResponse::error(request_id, error)
        }
    })
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(McpError::from)
}

fn handle_initialize(request: &McpRequest, session: &mut SessionState) -> Result<Value, McpError> {
    let params: Option<InitializeParams> = request
        .params
        .clone()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?;

    if let Some(params) = params {
        if params.protocol_version != MCP_PROTOCOL_VERSION {
            warn!(
                "Client {} asked for protocol {}, answering with {}",
                params.client_info.name, params.protocol_version, MCP_PROTOCOL_VERSION
            );
        }
        info!(
            "MCP client {} {} initialized",
            params.client_info.name, params.client_info.version
        );
        session.client_name = Some(params.client_info.name);
    }

    session.initialized = true;

    to_value(InitializeResult {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ListChangedCapability { list_changed: None }),
            prompts: Some(ListChangedCapability { list_changed: None }),
            resources: Some(ResourcesCapability {
                subscribe: Some(false),
                list_changed: None,
            }),
        },
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: crate::SERVER_VERSION.to_string(),
        },
    })
}

async fn handle_tools_call(
    request: &McpRequest,
    state: &McpState,
    session_id: &str,
) -> Result<Value, McpError> {
    let params: ToolsCallParams = request.parse_params()?;

    let tool = state
        .registry
        .get_tool(&params.name)
        .ok_or_else(|| McpError::MethodNotFound(format!("Unknown tool: {}", params.name)))?;

    let arguments = params
        .arguments
        .filter(|args| !args.is_null())
        .unwrap_or_else(|| Value::Object(Map::new()));
    let result = (tool.handler)(state.tool_context(session_id), arguments).await?;

    to_value(result)
}

fn handle_prompts_get(request: &McpRequest, state: &McpState) -> Result<Value, McpError> {
    let params: PromptsGetParams = request.parse_params()?;

    let prompt = state
        .registry
        .get_prompt(&params.name)
        .ok_or_else(|| McpError::InvalidParams(format!("Unknown prompt: {}", params.name)))?;

    let result = prompt.render(&params.arguments.unwrap_or_default())?;
    to_value(result)
}
