//! Fetchers for JSON datasets: the Taipei open-data API and plain JSON
//! blobs.

use crate::{SourceError, retry};

/// Base URL of the Taipei open-data dataset API.
pub const TAIPEI_OPEN_DATA_URL: &str = "https://data.taipei/api/v1/dataset";

/// Fetches one page of a Taipei open-data resource.
///
/// The API wraps records as `{"result": {"results": [...]}}`; a response
/// without that array is treated as a normalization error.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails or the body has an
/// unexpected shape.
pub async fn fetch_taipei_open_data(
    client: &reqwest::Client,
    base_url: &str,
    resource_id: &str,
    limit: u64,
) -> Result<Vec<serde_json::Value>, SourceError> {
    let url = format!("{base_url}/{resource_id}");
    let limit = limit.to_string();

    log::info!("Fetching open-data resource {resource_id} (limit {limit})");

    let body = retry::send_json(|| {
        client.get(&url).query(&[
            ("scope", "resourceAquire"),
            ("resource_id", resource_id),
            ("limit", limit.as_str()),
            ("offset", "0"),
        ])
    })
    .await?;

    extract_results(body).ok_or_else(|| SourceError::Normalization {
        message: format!("resource {resource_id}: response has no result.results array"),
    })
}

/// Fetches a JSON document whose top level is an array of records.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails or the document is not
/// an array.
pub async fn fetch_json_blob(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<serde_json::Value>, SourceError> {
    log::info!("Fetching JSON blob {url}");

    match retry::send_json(|| client.get(url)).await? {
        serde_json::Value::Array(records) => Ok(records),
        other => Err(SourceError::Normalization {
            message: format!("{url}: expected a JSON array, got {}", json_type(&other)),
        }),
    }
}

fn extract_results(mut body: serde_json::Value) -> Option<Vec<serde_json::Value>> {
    match body.get_mut("result")?.get_mut("results")?.take() {
        serde_json::Value::Array(records) => Some(records),
        _ => None,
    }
}

const fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
