//! Shared constants for end-to-end tests

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the server to accept connections
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// Per-request timeout for plain HTTP calls
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// How long to wait for the next SSE event before failing the test
pub const EVENT_TIMEOUT_MS: u64 = 5000;

// ============================================================================
// Credentials
// ============================================================================

/// Bearer token handed to the server under test
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

// ============================================================================
// Upstream fixtures
// ============================================================================

/// Person id returned by the stub `/search/person`
pub const TOM_HANKS_ID: u64 = 31;

/// Query that makes the stub upstream answer 404
pub const NOT_FOUND_QUERY: &str = "nobody-at-all";

/// Client info sent with `initialize`
pub const TEST_CLIENT_NAME: &str = "e2e-client";
