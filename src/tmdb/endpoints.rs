//! Typed helpers for the two TMDB endpoints the tools use.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::client::{ApiResponse, TmdbClient};
use super::models::{DiscoverMovieParams, Paged, SearchPersonParams};
use super::query::endpoint_with_query;
use super::token::AccessToken;

pub const SEARCH_PERSON_PATH: &str = "/search/person";
pub const DISCOVER_MOVIE_PATH: &str = "/discover/movie";

pub const MISSING_QUERY_MESSAGE: &str = "Search query is required";

fn auth_headers(token: &AccessToken) -> Result<HeaderMap, String> {
    let mut value = HeaderValue::from_str(&token.bearer_header())
        .map_err(|_| "Access token contains characters not allowed in a header".to_string())?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

async fn authorized_get<T, P>(
    client: &TmdbClient,
    token: &AccessToken,
    path: &str,
    params: &P,
) -> ApiResponse<T>
where
    T: DeserializeOwned + Paged,
    P: serde::Serialize,
{
    let endpoint = match endpoint_with_query(path, params) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            warn!("Failed to encode query for {}: {}", path, e);
            return ApiResponse::failure(None, format!("Invalid parameters: {}", e), 400);
        }
    };
    let headers = match auth_headers(token) {
        Ok(headers) => headers,
        Err(message) => return ApiResponse::failure(None, message, 400),
    };

    let response: ApiResponse<T> = client.get(&endpoint, headers).await;
    match (&response.data, &response.error) {
        (Some(data), None) => info!("{} returned {} results", path, data.result_count()),
        (_, Some(error)) => debug!("{} failed with {}: {}", path, response.status, error),
        (None, None) => {}
    }
    response
}

/// `GET /search/person`. A missing or empty query short-circuits with a
/// 400 and never reaches the network.
pub async fn search_person<T>(
    client: &TmdbClient,
    token: &AccessToken,
    params: &SearchPersonParams,
) -> ApiResponse<T>
where
    T: DeserializeOwned + Paged,
{
    if !params.has_query() {
        return ApiResponse::failure(None, MISSING_QUERY_MESSAGE, 400);
    }
    authorized_get(client, token, SEARCH_PERSON_PATH, params).await
}

/// `GET /discover/movie`.
pub async fn discover_movie<T>(
    client: &TmdbClient,
    token: &AccessToken,
    params: &DiscoverMovieParams,
) -> ApiResponse<T>
where
    T: DeserializeOwned + Paged,
{
    authorized_get(client, token, DISCOVER_MOVIE_PATH, params).await
}
