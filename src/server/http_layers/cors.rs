//! Permissive CORS for browser-based MCP clients.

use axum::{
    body::Body,
    http::{header, HeaderName, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};

pub fn allowed_methods() -> [Method; 5] {
    [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ]
}

pub fn allowed_headers() -> [HeaderName; 5] {
    [
        header::ORIGIN,
        HeaderName::from_static("x-requested-with"),
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::AUTHORIZATION,
    ]
}

/// Any origin, with the method and header lists above.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(allowed_methods())
        .allow_headers(allowed_headers())
}

/// `CorsLayer` answers every `OPTIONS` itself with an empty 200. Must sit
/// outside it so preflights come back as 204.
pub async fn preflight_no_content(request: Request<Body>, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_options {
        *response.status_mut() = StatusCode::NO_CONTENT;
        *response.body_mut() = Body::empty();
    }
    response
}
