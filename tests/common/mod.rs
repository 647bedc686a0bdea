//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient};
//!
//! #[tokio::test]
//! async fn test_initialize() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let mut session = client.open_session().await;
//!     let response = session.initialize().await;
//!     assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
//! }
//! ```

mod client;
mod constants;
mod server;
mod upstream;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use client::{result_text, McpSession, SseEvent, TestClient};
pub use constants::*;
pub use server::TestServer;
#[allow(unused_imports)]
pub use upstream::{discover_body, person_search_body, RecordedRequest};
