//! SSE session registry.
//!
//! Maps a session id to the channel feeding that session's MCP worker.
//! Entries are added when `/sse` is opened and removed when its event
//! stream is dropped, through [`SessionGuard`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::mcp::protocol::{McpRequest, JSONRPC_VERSION};

/// Opaque session identifier (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
    #[error("Session worker has stopped")]
    Closed,
}

/// Inbound side of one session.
#[derive(Clone)]
pub struct SessionTransport {
    inbound: mpsc::Sender<McpRequest>,
}

impl SessionTransport {
    pub fn new(inbound: mpsc::Sender<McpRequest>) -> Self {
        Self { inbound }
    }

    /// Validate a posted body as a JSON-RPC message and queue it for the
    /// session worker.
    pub async fn handle_post_message(&self, body: Value) -> Result<(), TransportError> {
        let request: McpRequest = serde_json::from_value(body)
            .map_err(|e| TransportError::InvalidMessage(e.to_string()))?;
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(TransportError::InvalidMessage(format!(
                "unsupported jsonrpc version '{}'",
                request.jsonrpc
            )));
        }
        self.inbound
            .send(request)
            .await
            .map_err(|_| TransportError::Closed)
    }
}

pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionTransport>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a transport under `id`, replacing any previous entry.
    pub fn register(&self, id: &SessionId, transport: SessionTransport) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(id.as_str().to_string(), transport);
        info!("SSE session started: {} ({} active)", id, sessions.len());
    }

    pub fn lookup(&self, id: &str) -> Option<SessionTransport> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Remove `id`. Returns false when it was not registered.
    pub fn unregister(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let removed = sessions.remove(id).is_some();
        if removed {
            info!("SSE session closed: {} ({} active)", id, sessions.len());
        } else {
            debug!("Session {} was not registered", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unregisters its session when dropped.
pub struct SessionGuard {
    registry: Arc<SessionRegistry>,
    id: SessionId,
}

impl SessionGuard {
    pub fn new(registry: Arc<SessionRegistry>, id: SessionId) -> Self {
        Self { registry, id }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.unregister(self.id.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport() -> (SessionTransport, mpsc::Receiver<McpRequest>) {
        let (tx, rx) = mpsc::channel(4);
        (SessionTransport::new(tx), rx)
    }

    #[test]
    fn generated_ids_are_unique_uuids() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn register_lookup_unregister() {
        let registry = SessionRegistry::new();
        let id = SessionId::generate();
        let (t, _rx) = transport();

        registry.register(&id, t);
        assert!(registry.lookup(id.as_str()).is_some());
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister(id.as_str()));
        assert!(registry.lookup(id.as_str()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn unregister_unknown_is_noop() {
        let registry = SessionRegistry::new();
        let id = SessionId::generate();
        let (t, _rx) = transport();
        registry.register(&id, t);

        assert!(!registry.unregister("never-registered"));
        assert!(!registry.unregister("never-registered"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn guard_unregisters_on_drop() {
        let registry = Arc::new(SessionRegistry::new());
        let id = SessionId::generate();
        let (t, _rx) = transport();
        registry.register(&id, t);

        let guard = SessionGuard::new(registry.clone(), id.clone());
        assert_eq!(guard.id(), &id);
        drop(guard);

        assert!(registry.lookup(id.as_str()).is_none());
    }

    #[tokio::test]
    async fn post_message_queues_request() {
        let (t, mut rx) = transport();
        t.handle_post_message(json!({"jsonrpc": "2.0", "id": 7, "method": "ping"}))
            .await
            .unwrap();
        let request = rx.recv().await.unwrap();
        assert_eq!(request.method, "ping");
    }

    #[tokio::test]
    async fn post_message_rejects_non_jsonrpc() {
        let (t, _rx) = transport();
        let result = t.handle_post_message(json!({"hello": "world"})).await;
        assert!(matches!(result, Err(TransportError::InvalidMessage(_))));

        let result = t
            .handle_post_message(json!({"jsonrpc": "1.0", "id": 1, "method": "ping"}))
            .await;
        assert!(matches!(result, Err(TransportError::InvalidMessage(_))));
    }

    #[tokio::test]
    async fn post_message_to_stopped_worker() {
        let (t, rx) = transport();
        drop(rx);
        let result = t
            .handle_post_message(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}))
            .await;
        assert!(matches!(result, Err(TransportError::Closed)));
    }
}
