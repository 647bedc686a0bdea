//! Query string construction for TMDB requests.
//!
//! Any serializable parameter struct is flattened into `key=value` pairs.
//! Absent, null and empty-string values are dropped.

use serde::Serialize;
use serde_json::{Number, Value};

/// Flatten `params` into ordered `(key, value)` pairs.
///
/// Keys come out sorted, so the result is deterministic for a given input.
pub fn query_pairs<T: Serialize>(params: &T) -> Result<Vec<(String, String)>, serde_json::Error> {
    let object = match serde_json::to_value(params)? {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(serde::ser::Error::custom(format!(
                "query parameters must serialize to an object, got {}",
                other
            )))
        }
    };

    Ok(object
        .into_iter()
        .filter_map(|(key, value)| stringify(&value).map(|text| (key, text)))
        .collect())
}

/// Build the URL-encoded query string (without the leading `?`).
pub fn build_query_string<T: Serialize>(params: &T) -> Result<String, serde_json::Error> {
    let pairs = query_pairs(params)?;
    Ok(pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&"))
}

/// Append the query built from `params` to `path`. No `?` is added when
/// every field was dropped.
pub fn endpoint_with_query<T: Serialize>(path: &str, params: &T) -> Result<String, serde_json::Error> {
    let query = build_query_string(params)?;
    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, query))
    }
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number_to_string(n)),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(stringify)
                .collect::<Vec<_>>()
                .join(",");
            if joined.is_empty() {
                None
            } else {
                Some(joined)
            }
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

// f64 Display drops a zero fraction ("7" rather than "7.0").
fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
    }
}
