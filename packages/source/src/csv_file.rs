//! Local CSV datasets.
//!
//! Rows are turned into JSON objects keyed by the trimmed header names so
//! they go through the same field mapping as API records. All values are
//! strings.

use std::path::Path;

use crate::SourceError;

/// Reads a CSV file into one JSON object per row.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or is not valid CSV.
pub async fn fetch_csv_file(path: &Path) -> Result<Vec<serde_json::Value>, SourceError> {
    log::info!("Reading CSV dataset {}", path.display());
    let bytes = tokio::fs::read(path).await?;
    parse_csv(&bytes)
}

/// Parses CSV bytes (header row first) into JSON objects.
///
/// # Errors
///
/// Returns [`SourceError`] if the data is not valid CSV or has no header
/// row.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<serde_json::Value>, SourceError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(SourceError::Normalization {
            message: "CSV file contains no header row".to_owned(),
        });
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let map: serde_json::Map<_, _> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = row.get(i).unwrap_or("").trim().to_owned();
                (header.clone(), serde_json::Value::String(value))
            })
            .collect();
        records.push(serde_json::Value::Object(map));
    }

    log::debug!("Parsed {} CSV rows", records.len());
    Ok(records)
}
