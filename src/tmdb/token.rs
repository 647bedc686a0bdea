//! Bearer credential lookup.
//!
//! The token is resolved on every call so that a changed environment is
//! picked up without rebuilding any long-lived object.

use std::fmt;

/// Environment variable holding the TMDB read access token.
pub const ACCESS_TOKEN_ENV: &str = "ACCESS_TOKEN";

/// A TMDB bearer token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Where tool handlers get the bearer credential from.
pub trait AccessTokenSource: Send + Sync {
    /// Returns `None` when no usable token is configured.
    fn access_token(&self) -> Option<AccessToken>;
}

/// Reads the token from an environment variable at call time.
pub struct EnvAccessToken {
    var_name: String,
}

impl EnvAccessToken {
    pub fn new() -> Self {
        Self::with_var(ACCESS_TOKEN_ENV)
    }

    pub fn with_var(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
        }
    }

    pub fn var_name(&self) -> &str {
        &self.var_name
    }
}

impl Default for EnvAccessToken {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessTokenSource for EnvAccessToken {
    fn access_token(&self) -> Option<AccessToken> {
        std::env::var(&self.var_name)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(AccessToken)
    }
}

/// Fixed token, for embedding and tests.
pub struct StaticAccessToken(Option<AccessToken>);

impl StaticAccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(AccessToken::new(token)))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl AccessTokenSource for StaticAccessToken {
    fn access_token(&self) -> Option<AccessToken> {
        self.0.clone()
    }
}
