//! HTTP client for The Movie Database API.
//!
//! Every call resolves to an [`ApiResponse`]; transport failures, upstream
//! errors and unparseable bodies are all reported in the envelope rather
//! than returned as `Err`.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TIMEOUT_SEC: u64 = 30;

/// Error text used when a body cannot be decoded.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse response";

/// Status reported when the request never produced an HTTP response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("Base URL must not be empty")]
    EmptyBaseUrl,
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Uniform result of an upstream call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: u16,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, status: u16) -> Self {
        Self {
            data: Some(data),
            error: None,
            status,
        }
    }

    pub fn failure(data: Option<T>, error: impl Into<String>, status: u16) -> Self {
        Self {
            data,
            error: Some(error.into()),
            status,
        }
    }

    pub fn transport_failure(error: impl Into<String>) -> Self {
        Self::failure(None, error, TRANSPORT_FAILURE_STATUS)
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Client settings, resolved from CLI and config file.
#[derive(Debug, Clone)]
pub struct TmdbClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Skip TLS certificate validation for this client only.
    pub accept_invalid_certs: bool,
}

impl Default for TmdbClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SEC),
            accept_invalid_certs: false,
        }
    }
}

pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    default_headers: HeaderMap,
}

impl TmdbClient {
    pub fn new(config: TmdbClientConfig) -> Result<Self, TmdbError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(TmdbError::EmptyBaseUrl);
        }

        if config.accept_invalid_certs {
            warn!(
                "TLS certificate validation is disabled for TMDB requests to {}",
                base_url
            );
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            client,
            base_url,
            default_headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base_url}{endpoint}`.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, headers: HeaderMap) -> ApiResponse<T> {
        self.fetch(Method::GET, endpoint, None, headers).await
    }

    /// `POST {base_url}{endpoint}` with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        headers: HeaderMap,
    ) -> ApiResponse<T> {
        let body = match serde_json::to_vec(body) {
            Ok(body) => body,
            Err(e) => {
                return ApiResponse::transport_failure(format!(
                    "Failed to serialize request body: {}",
                    e
                ))
            }
        };
        self.fetch(Method::POST, endpoint, Some(body), headers).await
    }

    /// Defaults first, then the caller's headers replacing any same-named entry.
    fn merge_headers(&self, headers: HeaderMap) -> HeaderMap {
        let mut merged = self.default_headers.clone();
        merged.extend(headers);
        merged
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
        headers: HeaderMap,
    ) -> ApiResponse<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("TMDB {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .headers(self.merge_headers(headers));
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("TMDB request to {} failed: {}", url, e);
                return ApiResponse::transport_failure(describe_transport_error(&e));
            }
        };

        let status = response.status();
        debug!("TMDB responded with status {}", status);

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read TMDB response body: {}", e);
                return ApiResponse::transport_failure(describe_transport_error(&e));
            }
        };

        if status.is_success() {
            match serde_json::from_slice::<T>(&bytes) {
                Ok(data) => ApiResponse::ok(data, status.as_u16()),
                Err(e) => {
                    warn!("Failed to parse TMDB response: {}", e);
                    ApiResponse::failure(None, PARSE_FAILURE_MESSAGE, status.as_u16())
                }
            }
        } else {
            let json: Option<Value> = serde_json::from_slice(&bytes).ok();
            let error = upstream_error_message(status, json.as_ref(), &bytes);
            warn!("TMDB error response ({}): {}", status.as_u16(), error);
            let data = json.and_then(|value| serde_json::from_value::<T>(value).ok());
            ApiResponse::failure(data, error, status.as_u16())
        }
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timed out: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}

/// TMDB puts a human readable message in `status_message`. Fall back to
/// the raw body, then the reason phrase, then the bare code.
fn upstream_error_message(status: StatusCode, json: Option<&Value>, raw: &[u8]) -> String {
    if let Some(message) = json
        .and_then(|v| v.get("status_message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
    {
        return message.to_string();
    }

    if let Some(json) = json {
        return json.to_string();
    }

    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}
