use super::RequestsLoggingLevel;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub bind_address: String,
    /// Interval between SSE keep-alive comments.
    pub sse_keep_alive_sec: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            bind_address: "0.0.0.0".to_string(),
            sse_keep_alive_sec: 15,
        }
    }
}
