pub mod config;
mod http_layers;
pub mod messages;
pub mod server;
pub mod sessions;
pub mod sse;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use sessions::{SessionId, SessionRegistry};
