//! Request parameters and response shapes for the TMDB endpoints we call.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

// ============================================================================
// Request parameters
// ============================================================================

/// Parameters for `GET /search/person`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPersonParams {
    pub query: Option<String>,
    pub include_adult: Option<bool>,
    pub language: Option<String>,
    pub page: Option<Number>,
}

impl SearchPersonParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn has_query(&self) -> bool {
        self.query.as_deref().is_some_and(|q| !q.is_empty())
    }
}

/// `with_release_type` accepts either a single type (1-6) or a
/// comma/pipe separated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReleaseType {
    Number(Number),
    Text(String),
}

/// Parameters for `GET /discover/movie`.
///
/// Range filters are written with TMDB's dotted names on the wire
/// (`release_date.gte`); the underscore spelling is accepted when
/// deserializing tool arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverMovieParams {
    pub include_adult: Option<bool>,
    pub include_video: Option<bool>,
    pub language: Option<String>,
    pub page: Option<Number>,
    pub primary_release_year: Option<Number>,
    #[serde(
        rename = "primary_release_date.gte",
        alias = "primary_release_date_gte"
    )]
    pub primary_release_date_gte: Option<String>,
    #[serde(
        rename = "primary_release_date.lte",
        alias = "primary_release_date_lte"
    )]
    pub primary_release_date_lte: Option<String>,
    pub region: Option<String>,
    #[serde(rename = "release_date.gte", alias = "release_date_gte")]
    pub release_date_gte: Option<String>,
    #[serde(rename = "release_date.lte", alias = "release_date_lte")]
    pub release_date_lte: Option<String>,
    pub sort_by: Option<String>,
    #[serde(rename = "vote_average.gte", alias = "vote_average_gte")]
    pub vote_average_gte: Option<f64>,
    #[serde(rename = "vote_average.lte", alias = "vote_average_lte")]
    pub vote_average_lte: Option<f64>,
    #[serde(rename = "vote_count.gte", alias = "vote_count_gte")]
    pub vote_count_gte: Option<f64>,
    #[serde(rename = "vote_count.lte", alias = "vote_count_lte")]
    pub vote_count_lte: Option<f64>,
    pub watch_region: Option<String>,
    pub with_cast: Option<String>,
    pub with_companies: Option<String>,
    pub with_crew: Option<String>,
    pub with_genres: Option<String>,
    pub with_keywords: Option<String>,
    pub with_origin_country: Option<String>,
    pub with_original_language: Option<String>,
    pub with_people: Option<String>,
    pub with_release_type: Option<ReleaseType>,
    #[serde(rename = "with_runtime.gte", alias = "with_runtime_gte")]
    pub with_runtime_gte: Option<Number>,
    #[serde(rename = "with_runtime.lte", alias = "with_runtime_lte")]
    pub with_runtime_lte: Option<Number>,
    pub with_watch_monetization_types: Option<String>,
    pub with_watch_providers: Option<String>,
    pub without_companies: Option<String>,
    pub without_genres: Option<String>,
    pub without_keywords: Option<String>,
    pub without_watch_providers: Option<String>,
    pub year: Option<Number>,
}

// ============================================================================
// Responses
// ============================================================================

/// Something TMDB returned in a `known_for` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownFor {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonResult {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub gender: Option<u8>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for: Vec<KnownFor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPersonResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<PersonResult>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieResult {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub video: bool,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MovieResult>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// Paged listings, so callers can log how much came back without caring
/// whether they asked for typed or raw JSON.
pub trait Paged {
    fn result_count(&self) -> usize;
}

impl Paged for SearchPersonResponse {
    fn result_count(&self) -> usize {
        self.results.len()
    }
}

impl Paged for MovieResponse {
    fn result_count(&self) -> usize {
        self.results.len()
    }
}

impl Paged for Value {
    fn result_count(&self) -> usize {
        self.get("results")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0)
    }
}
