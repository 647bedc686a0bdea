//! MCP (Model Context Protocol) Server
//!
//! Exposes the movie database tools and a handful of prompts to LLM
//! clients.
//!
//! ## Architecture
//!
//! - Transport: SSE at `/sse`, client messages posted to `/messages`
//! - Tools: statically registered at startup
//! - Discovery: session-independent manifest on `/messages`

pub mod context;
pub mod discovery;
pub mod handler;
pub mod prompts;
pub mod protocol;
pub mod registry;
pub mod tools;

pub use handler::{serve_session, McpState};
pub use protocol::{McpError, McpRequest, McpResponse};
pub use registry::McpRegistry;
