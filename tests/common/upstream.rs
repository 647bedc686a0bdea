//! Stub TMDB API for end-to-end tests
//!
//! Serves canned JSON on `/3/search/person` and `/3/discover/movie` and
//! records every request so tests can assert on the outbound query string
//! and bearer header.

use super::constants::*;
use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// One request seen by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

/// Body returned for any successful person search
pub fn person_search_body() -> Value {
    json!({
        "page": 1,
        "results": [{
            "id": TOM_HANKS_ID,
            "name": "Tom Hanks",
            "known_for_department": "Acting",
            "popularity": 81.3,
            "known_for": [{"id": 13, "title": "Forrest Gump", "media_type": "movie"}]
        }],
        "total_pages": 1,
        "total_results": 1
    })
}

/// Body returned for any successful discover call
pub fn discover_body() -> Value {
    json!({
        "page": 1,
        "results": [{
            "id": 13,
            "title": "Forrest Gump",
            "release_date": "1994-06-23",
            "vote_average": 8.5
        }],
        "total_pages": 1,
        "total_results": 1
    })
}

fn record(recorded: &Recorded, uri: &Uri, query: Option<String>, headers: &HeaderMap) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    recorded.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        query,
        authorization,
    });
}

async fn search_person(
    State(recorded): State<Recorded>,
    uri: Uri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    record(&recorded, &uri, query.clone(), &headers);
    let not_found = query
        .as_deref()
        .is_some_and(|q| q.contains(NOT_FOUND_QUERY));
    if not_found {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "status_code": 34,
                "status_message": "The resource you requested could not be found."
            })),
        )
            .into_response();
    }
    Json(person_search_body()).into_response()
}

async fn discover_movie(
    State(recorded): State<Recorded>,
    uri: Uri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    record(&recorded, &uri, query, &headers);
    Json(discover_body()).into_response()
}

/// Running stub upstream. Shuts down on drop.
pub struct StubTmdb {
    /// Base URL to hand to the TMDB client, including the `/3` prefix
    pub base_url: String,
    recorded: Recorded,
    _shutdown_tx: Option<oneshot::Sender<()>>,
}

impl StubTmdb {
    pub async fn spawn() -> Self {
        let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/3/search/person", get(search_person))
            .route("/3/discover/movie", get(discover_movie))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub upstream");
        let port = listener.local_addr().unwrap().port();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Stub upstream failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}/3", port),
            recorded,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Everything received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }
}

impl Drop for StubTmdb {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
