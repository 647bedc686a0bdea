mod file_config;

pub use file_config::{FileConfig, TmdbFileConfig};

use crate::server::{RequestsLoggingLevel, ServerConfig};
use crate::tmdb::{TmdbClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SEC};
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Load `KEY=value` lines into the process environment without overriding
/// variables that are already set. With no `path`, looks for `.env` in the
/// current directory and its parents. A missing file is not an error.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e).context("Failed to load environment file"),
    }
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub bind_address: String,
    pub logging_level: RequestsLoggingLevel,
    pub tmdb_base_url: String,
    pub request_timeout_sec: u64,
    pub sse_keep_alive_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            bind_address: "0.0.0.0".to_string(),
            logging_level: RequestsLoggingLevel::Path,
            tmdb_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_sec: DEFAULT_TIMEOUT_SEC,
            sse_keep_alive_sec: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub bind_address: String,
    pub logging_level: RequestsLoggingLevel,
    pub sse_keep_alive_sec: u64,
    pub tmdb: TmdbSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TmdbSettings {
    pub base_url: String,
    pub request_timeout_sec: u64,
    pub accept_invalid_certs: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let bind_address = file
            .bind_address
            .unwrap_or_else(|| cli.bind_address.clone());

        let logging_level = match file.logging_level {
            Some(s) => match parse_logging_level(&s) {
                Some(level) => level,
                None => bail!("Invalid logging_level in config file: {}", s),
            },
            None => cli.logging_level.clone(),
        };

        let sse_keep_alive_sec = file.sse_keep_alive_sec.unwrap_or(cli.sse_keep_alive_sec);
        if sse_keep_alive_sec == 0 {
            bail!("sse_keep_alive_sec must be greater than 0");
        }

        let tmdb_file = file.tmdb.unwrap_or_default();
        let base_url = tmdb_file
            .base_url
            .unwrap_or_else(|| cli.tmdb_base_url.clone());
        if base_url.trim().trim_end_matches('/').is_empty() {
            bail!("TMDB base URL must not be empty");
        }
        let request_timeout_sec = tmdb_file
            .request_timeout_sec
            .unwrap_or(cli.request_timeout_sec);
        if request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than 0");
        }

        Ok(Self {
            port,
            bind_address,
            logging_level,
            sse_keep_alive_sec,
            tmdb: TmdbSettings {
                base_url,
                request_timeout_sec,
                accept_invalid_certs: tmdb_file.accept_invalid_certs.unwrap_or(false),
            },
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            bind_address: self.bind_address.clone(),
            sse_keep_alive_sec: self.sse_keep_alive_sec,
        }
    }

    pub fn tmdb_client_config(&self) -> TmdbClientConfig {
        TmdbClientConfig {
            base_url: self.tmdb.base_url.clone(),
            timeout: Duration::from_secs(self.tmdb.request_timeout_sec),
            accept_invalid_certs: self.tmdb.accept_invalid_certs,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
