//! Movie Database Tools
//!
//! Person search and film discovery against TMDB. Handlers never fail at the
//! protocol level: every problem becomes an error-flagged tool result.

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::mcp::context::ToolContext;
use crate::mcp::protocol::ToolsCallResult;
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolResult};
use crate::tmdb::{self, AccessToken, ApiResponse, DiscoverMovieParams, SearchPersonParams};

pub const SEARCH_PERSON_TOOL: &str = "movie_database_search_person";
pub const DISCOVER_FILMS_TOOL: &str = "movie_database_discover_films";

pub const MISSING_TOKEN_MESSAGE: &str = "Missing API access token";

const SEARCH_PERSON_FAILURE: &str = "Failed to search for person";
const DISCOVER_FILMS_FAILURE: &str = "Failed to discover films";

/// Register movie tools with the registry
pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(search_person_tool());
    registry.register_tool(discover_films_tool());
}

#[derive(Clone, Copy)]
enum FieldType {
    Text,
    Number,
    Boolean,
    NumberOrText,
}

impl FieldType {
    fn schema(self, description: &str) -> Value {
        match self {
            FieldType::Text => json!({"type": "string", "description": description}),
            FieldType::Number => json!({"type": "number", "description": description}),
            FieldType::Boolean => json!({"type": "boolean", "description": description}),
            FieldType::NumberOrText => {
                json!({"type": ["number", "string"], "description": description})
            }
        }
    }
}

fn object_schema(fields: &[(&str, FieldType, &str)], required: &[&str]) -> Value {
    let properties: Map<String, Value> = fields
        .iter()
        .map(|(name, kind, description)| (name.to_string(), kind.schema(description)))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn access_token(ctx: &ToolContext) -> Option<AccessToken> {
    ctx.token_source.access_token()
}

/// Turn an upstream envelope into a tool result.
fn into_tool_result(prefix: &str, response: ApiResponse<Value>) -> ToolResult {
    match response {
        ApiResponse {
            data: Some(data),
            error: None,
            ..
        } => Ok(ToolsCallResult::json(&data)?),
        ApiResponse {
            error: Some(error),
            status,
            ..
        } => Ok(ToolsCallResult::error(format!(
            "{}: {} (status {})",
            prefix, error, status
        ))),
        ApiResponse { status, .. } => Ok(ToolsCallResult::error(format!(
            "{}: empty response (status {})",
            prefix, status
        ))),
    }
}

// ============================================================================
// movie_database_search_person
// ============================================================================

const SEARCH_PERSON_FIELDS: &[(&str, FieldType, &str)] = &[
    ("query", FieldType::Text, "The search query for finding a person"),
    ("include_adult", FieldType::Boolean, "Include adult content in results"),
    ("language", FieldType::Text, "Language to use for results (e.g., en-US)"),
    ("page", FieldType::Number, "Page number for pagination"),
];

fn search_person_tool() -> RegisteredTool {
    ToolBuilder::new(SEARCH_PERSON_TOOL)
        .description(
            "Search for actors, directors, and other film industry professionals with \
             comprehensive biographical information and filmography details",
        )
        .input_schema(object_schema(SEARCH_PERSON_FIELDS, &["query"]))
        .build(search_person_handler)
}

async fn search_person_handler(ctx: ToolContext, params: Value) -> ToolResult {
    let params: SearchPersonParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => {
            debug!("Rejected {} arguments: {}", SEARCH_PERSON_TOOL, e);
            return Ok(ToolsCallResult::error(format!(
                "{}: Invalid arguments: {}",
                SEARCH_PERSON_FAILURE, e
            )));
        }
    };
    info!(
        "{} called (session {:?}) with {:?}",
        SEARCH_PERSON_TOOL, ctx.session_id, params
    );

    let Some(token) = access_token(&ctx) else {
        warn!("ACCESS_TOKEN is not set, cannot call TMDB");
        return Ok(ToolsCallResult::error(format!(
            "{}: {}",
            SEARCH_PERSON_FAILURE, MISSING_TOKEN_MESSAGE
        )));
    };

    let response = tmdb::search_person::<Value>(&ctx.tmdb, &token, &params).await;
    into_tool_result(SEARCH_PERSON_FAILURE, response)
}

// ============================================================================
// movie_database_discover_films
// ============================================================================

const AND_OR: &str = "(comma-separated for AND, pipe-separated for OR)";

fn discover_fields() -> Vec<(&'static str, FieldType, String)> {
    use FieldType::*;
    let f = |name: &'static str, kind: FieldType, description: &str| {
        (name, kind, description.to_string())
    };
    let and_or = |name: &'static str, what: &str| {
        (name, Text, format!("Filter by {} {}", what, AND_OR))
    };
    vec![
        f("include_adult", Boolean, "Include adult content in results"),
        f("include_video", Boolean, "Include videos in results"),
        f("language", Text, "Language to use for results (e.g., en-US)"),
        f("page", Number, "Page number for pagination"),
        f("primary_release_year", Number, "Filter by primary release year"),
        f(
            "primary_release_date_gte",
            Text,
            "Filter by primary release date (greater than or equal, format: YYYY-MM-DD)",
        ),
        f(
            "primary_release_date_lte",
            Text,
            "Filter by primary release date (less than or equal, format: YYYY-MM-DD)",
        ),
        f("region", Text, "Filter by region"),
        f(
            "release_date_gte",
            Text,
            "Filter by release date (greater than or equal, format: YYYY-MM-DD)",
        ),
        f(
            "release_date_lte",
            Text,
            "Filter by release date (less than or equal, format: YYYY-MM-DD)",
        ),
        f(
            "sort_by",
            Text,
            "Sort results by (e.g., popularity.desc, release_date.desc)",
        ),
        f("vote_average_gte", Number, "Filter by vote average (greater than or equal)"),
        f("vote_average_lte", Number, "Filter by vote average (less than or equal)"),
        f("vote_count_gte", Number, "Filter by vote count (greater than or equal)"),
        f("vote_count_lte", Number, "Filter by vote count (less than or equal)"),
        f("watch_region", Text, "Filter by watch region"),
        and_or("with_cast", "cast"),
        and_or("with_companies", "companies"),
        and_or("with_crew", "crew"),
        and_or("with_genres", "genres"),
        and_or("with_keywords", "keywords"),
        f("with_origin_country", Text, "Filter by origin country"),
        f("with_original_language", Text, "Filter by original language"),
        and_or("with_people", "people"),
        (
            "with_release_type",
            NumberOrText,
            "Filter by release type (1-6, comma-separated for AND, pipe-separated for OR)"
                .to_string(),
        ),
        f(
            "with_runtime_gte",
            Number,
            "Filter by runtime in minutes (greater than or equal)",
        ),
        f(
            "with_runtime_lte",
            Number,
            "Filter by runtime in minutes (less than or equal)",
        ),
        f(
            "with_watch_monetization_types",
            Text,
            "Filter by monetization types (flatrate, free, ads, rent, buy)",
        ),
        and_or("with_watch_providers", "watch providers"),
        f("without_companies", Text, "Exclude companies (comma-separated)"),
        f("without_genres", Text, "Exclude genres (comma-separated)"),
        f("without_keywords", Text, "Exclude keywords (comma-separated)"),
        f(
            "without_watch_providers",
            Text,
            "Exclude watch providers (comma-separated)",
        ),
        f("year", Number, "Filter by year"),
    ]
}

fn discover_films_tool() -> RegisteredTool {
    let fields = discover_fields();
    let borrowed: Vec<(&str, FieldType, &str)> = fields
        .iter()
        .map(|(name, kind, description)| (*name, *kind, description.as_str()))
        .collect();

    ToolBuilder::new(DISCOVER_FILMS_TOOL)
        .description(
            "Explore films with advanced filtering options including cast, genres, release \
             dates, and ratings to find exactly what you're looking for",
        )
        .input_schema(object_schema(&borrowed, &[]))
        .build(discover_films_handler)
}

async fn discover_films_handler(ctx: ToolContext, params: Value) -> ToolResult {
    let params: DiscoverMovieParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => {
            debug!("Rejected {} arguments: {}", DISCOVER_FILMS_TOOL, e);
            return Ok(ToolsCallResult::error(format!(
                "{}: Invalid arguments: {}",
                DISCOVER_FILMS_FAILURE, e
            )));
        }
    };
    info!(
        "{} called (session {:?}) with {:?}",
        DISCOVER_FILMS_TOOL, ctx.session_id, params
    );

    let Some(token) = access_token(&ctx) else {
        warn!("ACCESS_TOKEN is not set, cannot call TMDB");
        return Ok(ToolsCallResult::error(format!(
            "{}: {}",
            DISCOVER_FILMS_FAILURE, MISSING_TOKEN_MESSAGE
        )));
    };

    let response = tmdb::discover_movie::<Value>(&ctx.tmdb, &token, &params).await;
    into_tool_result(DISCOVER_FILMS_FAILURE, response)
}
