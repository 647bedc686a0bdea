//! HTTP and SSE clients for end-to-end tests
//!
//! `TestClient` covers the plain HTTP surface. `McpSession` holds one open
//! `GET /sse` stream and posts JSON-RPC messages to the endpoint it announced.
//!
//! When routes or message formats change, update only this file.

use super::constants::*;
use axum::body::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET / (server stats)
    pub async fn get_stats(&self) -> Value {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Stats request failed")
            .json()
            .await
            .expect("Stats body is not JSON")
    }

    /// POST /messages with a raw body and an optional session id
    pub async fn post_raw(&self, session_id: Option<&str>, body: impl Into<String>) -> Response {
        let url = match session_id {
            Some(id) => format!("{}/messages?sessionId={}", self.base_url, id),
            None => format!("{}/messages", self.base_url),
        };
        self.client
            .post(url)
            .header("content-type", "application/json")
            .body(body.into())
            .send()
            .await
            .expect("Message request failed")
    }

    /// POST /messages with a JSON body and an optional session id
    pub async fn post_json(&self, session_id: Option<&str>, body: &Value) -> Response {
        self.post_raw(session_id, body.to_string()).await
    }

    /// Opens `GET /sse` and waits for the `endpoint` event
    pub async fn open_session(&self) -> McpSession {
        McpSession::open(self).await
    }
}

/// A single server-sent event
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Parses one `\n\n`-terminated block. Comment-only blocks yield `None`.
fn parse_event(block: &str) -> Option<SseEvent> {
    let mut event = None;
    let mut data: Vec<&str> = Vec::new();
    for line in block.lines() {
        if let Some(value) = line.strip_prefix("event:") {
            event = Some(value.trim_start().to_string());
        } else if let Some(value) = line.strip_prefix("data:") {
            data.push(value.strip_prefix(' ').unwrap_or(value));
        }
    }
    if event.is_none() && data.is_empty() {
        return None;
    }
    Some(SseEvent {
        event: event.unwrap_or_else(|| "message".to_string()),
        data: data.join("\n"),
    })
}

/// An open MCP session over SSE
pub struct McpSession {
    http: reqwest::Client,
    base_url: String,
    stream: BoxStream<'static, reqwest::Result<Bytes>>,
    buffer: String,
    /// Path announced by the `endpoint` event, e.g. `/messages?sessionId=...`
    pub endpoint: String,
    pub session_id: String,
}

impl McpSession {
    async fn open(client: &TestClient) -> Self {
        let response = client
            .client
            .get(format!("{}/sse", client.base_url))
            .header("accept", "text/event-stream")
            .timeout(Duration::from_secs(3600))
            .send()
            .await
            .expect("SSE request failed");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let mut session = Self {
            http: client.client.clone(),
            base_url: client.base_url.clone(),
            stream: response.bytes_stream().boxed(),
            buffer: String::new(),
            endpoint: String::new(),
            session_id: String::new(),
        };

        let first = session.next_event().await;
        assert_eq!(first.event, "endpoint", "First event must be endpoint");
        session.session_id = first
            .data
            .split("sessionId=")
            .nth(1)
            .expect("Endpoint has no sessionId")
            .to_string();
        session.endpoint = first.data;
        session
    }

    /// Next non-comment event, or panic after `EVENT_TIMEOUT_MS`
    pub async fn next_event(&mut self) -> SseEvent {
        tokio::time::timeout(Duration::from_millis(EVENT_TIMEOUT_MS), self.read_event())
            .await
            .expect("Timed out waiting for SSE event")
    }

    /// Like `next_event` but returns `None` if nothing arrives within `wait`
    pub async fn try_next_event(&mut self, wait: Duration) -> Option<SseEvent> {
        tokio::time::timeout(wait, self.read_event()).await.ok()
    }

    async fn read_event(&mut self) -> SseEvent {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let block: String = self.buffer.drain(..end + 2).collect();
                if let Some(event) = parse_event(&block) {
                    return event;
                }
                continue;
            }
            let chunk = self
                .stream
                .next()
                .await
                .expect("SSE stream ended")
                .expect("SSE stream failed");
            self.buffer
                .push_str(&String::from_utf8_lossy(&chunk).replace("\r\n", "\n"));
        }
    }

    /// Posts a JSON-RPC message to this session's endpoint
    pub async fn post(&self, message: &Value) -> Response {
        self.http
            .post(format!("{}{}", self.base_url, self.endpoint))
            .header("content-type", "application/json")
            .body(message.to_string())
            .send()
            .await
            .expect("Message request failed")
    }

    /// Sends a request and waits for its response on the event stream
    pub async fn request(&mut self, id: i64, method: &str, params: Value) -> Value {
        let response = self
            .post(&json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);

        let event = self.next_event().await;
        assert_eq!(event.event, "message");
        let message: Value = serde_json::from_str(&event.data).expect("Message is not JSON");
        assert_eq!(message["id"], json!(id), "Response id mismatch: {}", message);
        message
    }

    /// Sends a notification. No response is expected.
    pub async fn notify(&self, method: &str) -> Response {
        self.post(&json!({"jsonrpc": "2.0", "method": method}))
            .await
    }

    /// Runs the `initialize` handshake
    pub async fn initialize(&mut self) -> Value {
        let response = self
            .request(
                1,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": TEST_CLIENT_NAME, "version": "1.0.0"}
                }),
            )
            .await;
        let ack = self.notify("notifications/initialized").await;
        assert_eq!(ack.status(), reqwest::StatusCode::ACCEPTED);
        response
    }

    /// `tools/call`, returning the `result` object
    pub async fn call_tool(&mut self, id: i64, name: &str, arguments: Value) -> Value {
        let response = self
            .request(id, "tools/call", json!({"name": name, "arguments": arguments}))
            .await;
        assert!(
            response.get("error").is_none(),
            "tools/call failed: {}",
            response
        );
        response["result"].clone()
    }
}

/// Concatenated text of a tool result's content items
pub fn result_text(result: &Value) -> String {
    result["content"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}
