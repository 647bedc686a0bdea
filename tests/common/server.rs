//! Test server lifecycle management
//!
//! Each test gets an isolated MCP server on a random port, talking to its
//! own stub TMDB upstream.

use super::constants::*;
use super::upstream::StubTmdb;
use moviedb_mcp_server::tmdb::TmdbClientConfig;
use moviedb_mcp_server::{
    make_app, AccessTokenSource, McpState, RequestsLoggingLevel, ServerConfig, StaticAccessToken,
    TmdbClient,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Test server instance with its own upstream stub
///
/// When dropped, open event streams are cancelled and the server shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// The stub TMDB API this server forwards tool calls to
    pub upstream: StubTmdb,

    shutdown: CancellationToken,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server holding a valid access token
    pub async fn spawn() -> Self {
        Self::spawn_with_token(StaticAccessToken::new(TEST_ACCESS_TOKEN)).await
    }

    /// Spawns a server with no access token configured
    pub async fn spawn_without_token() -> Self {
        Self::spawn_with_token(StaticAccessToken::missing()).await
    }

    async fn spawn_with_token(token: StaticAccessToken) -> Self {
        let upstream = StubTmdb::spawn().await;

        let tmdb = TmdbClient::new(TmdbClientConfig {
            base_url: upstream.base_url.clone(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            accept_invalid_certs: false,
        })
        .expect("Failed to build TMDB client");
        let token_source: Arc<dyn AccessTokenSource> = Arc::new(token);
        let mcp_state = Arc::new(McpState::new(tmdb, token_source));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            bind_address: "127.0.0.1".to_string(),
            sse_keep_alive_sec: 1,
        };

        let shutdown = CancellationToken::new();
        let app = make_app(config, mcp_state, shutdown.clone());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            upstream,
            shutdown,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the `/` endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Event streams never end on their own
        self.shutdown.cancel();
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
