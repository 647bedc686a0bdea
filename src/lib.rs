//! MovieDB MCP Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod mcp;
pub mod server;
pub mod tmdb;

/// `<package version>-<git hash>`, reported by `initialize` and `GET /`.
pub const SERVER_VERSION: &str = env!("APP_VERSION");

// Re-export commonly used types for convenience
pub use mcp::McpState;
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use tmdb::{AccessTokenSource, EnvAccessToken, StaticAccessToken, TmdbClient};
