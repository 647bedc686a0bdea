mod cors;
mod requests_logging;

pub use cors::{allowed_headers, allowed_methods, cors_layer, preflight_no_content};
pub use requests_logging::{log_requests, RequestsLoggingLevel};
