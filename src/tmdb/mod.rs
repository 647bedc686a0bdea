//! Access to The Movie Database REST API.

mod client;
mod endpoints;
mod models;
mod query;
mod token;

pub use client::{
    ApiResponse, TmdbClient, TmdbClientConfig, TmdbError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SEC,
    PARSE_FAILURE_MESSAGE, TRANSPORT_FAILURE_STATUS,
};
pub use endpoints::{
    discover_movie, search_person, DISCOVER_MOVIE_PATH, MISSING_QUERY_MESSAGE, SEARCH_PERSON_PATH,
};
pub use models::{
    DiscoverMovieParams, KnownFor, MovieResponse, MovieResult, Paged, PersonResult, ReleaseType,
    SearchPersonParams, SearchPersonResponse,
};
pub use query::{build_query_string, endpoint_with_query, query_pairs};
pub use token::{
    AccessToken, AccessTokenSource, EnvAccessToken, StaticAccessToken, ACCESS_TOKEN_ENV,
};
