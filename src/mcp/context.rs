//! MCP Tool Execution Context
//!
//! Provides access to server state for tool implementations.

use std::sync::Arc;

use crate::tmdb::{AccessTokenSource, TmdbClient};

/// Context provided to tool handlers during execution
#[derive(Clone)]
pub struct ToolContext {
    /// Outbound client for The Movie Database
    pub tmdb: Arc<TmdbClient>,

    /// Where the bearer credential is read from on each call
    pub token_source: Arc<dyn AccessTokenSource>,

    /// Session the call arrived on, for logging
    pub session_id: Option<String>,
}
