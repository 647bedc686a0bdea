use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moviedb_mcp_server::config::{load_env_file, AppConfig, CliConfig, FileConfig};
use moviedb_mcp_server::tmdb::{AccessTokenSource, EnvAccessToken, TmdbClient, ACCESS_TOKEN_ENV};
use moviedb_mcp_server::{run_server, McpState, RequestsLoggingLevel, SERVER_VERSION};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[clap(version = SERVER_VERSION, about = "MCP server exposing The Movie Database over SSE")]
struct CliArgs {
    /// Path to a TOML config file. Values found there override CLI flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Environment file to load (e.g. ACCESS_TOKEN). Defaults to the nearest `.env`.
    /// Variables already set in the environment win.
    #[clap(long, value_parser = parse_path)]
    pub env_file: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The address to bind to.
    #[clap(long, default_value = "0.0.0.0")]
    pub bind_address: String,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Base URL of the TMDB API.
    #[clap(long, default_value = moviedb_mcp_server::tmdb::DEFAULT_BASE_URL)]
    pub tmdb_base_url: String,

    /// Timeout in seconds for TMDB requests.
    #[clap(long, default_value_t = 30)]
    pub request_timeout_sec: u64,

    /// Seconds between keep-alive comments on open SSE streams.
    #[clap(long, default_value_t = 15)]
    pub sse_keep_alive_sec: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            port: self.port,
            bind_address: self.bind_address.clone(),
            logging_level: self.logging_level.clone(),
            tmdb_base_url: self.tmdb_base_url.clone(),
            request_timeout_sec: self.request_timeout_sec,
            sse_keep_alive_sec: self.sse_keep_alive_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // Before logging, so LOG_LEVEL can come from the file too.
    let env_file = load_env_file(cli_args.env_file.as_deref());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    if let Some(path) = env_file? {
        info!("Loaded environment from {:?}", path);
    }

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)
        .context("Invalid configuration")?;

    info!("Starting moviedb-mcp-server {}", SERVER_VERSION);
    info!(
        "TMDB base URL {} (timeout {}s)",
        app_config.tmdb.base_url, app_config.tmdb.request_timeout_sec
    );

    let token_source = EnvAccessToken::new();
    if token_source.access_token().is_none() {
        warn!(
            "{} is not set; tool calls will fail until it is provided",
            ACCESS_TOKEN_ENV
        );
    }

    let tmdb = TmdbClient::new(app_config.tmdb_client_config())
        .context("Failed to create TMDB client")?;
    let mcp_state = Arc::new(McpState::new(tmdb, Arc::new(token_source)));

    run_server(app_config.server_config(), mcp_state).await
}
