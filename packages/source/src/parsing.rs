//! Field extraction helpers for raw upstream records.
//!
//! Upstream datasets are inconsistent about types: the same coordinate
//! may arrive as a JSON number in one dataset and as a string in another,
//! and CSV files only ever contain strings.

/// Parses a coordinate from a JSON number or a numeric string.
///
/// Returns `None` for missing, empty, or unparseable values.
#[must_use]
pub fn parse_coordinate(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Reads a coordinate field from a JSON record.
#[must_use]
pub fn get_coordinate(record: &serde_json::Value, field: &str) -> Option<f64> {
    parse_coordinate(record.get(field)?)
}

/// Reads a field as display text. Numbers are rendered as text; empty
/// strings count as missing.
#[must_use]
pub fn get_text(record: &serde_json::Value, field: &str) -> Option<String> {
    match record.get(field)? {
        serde_json::Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns the first non-empty text among `fields`, tried in order.
#[must_use]
pub fn first_text(record: &serde_json::Value, fields: &[String]) -> Option<String> {
    fields.iter().find_map(|field| get_text(record, field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_and_string_coordinates() {
        let record = serde_json::json!({
            "wgsy": "25.0418",
            "wgsx": 121.5436,
            "blank": "",
            "junk": "N/A",
        });
        assert!((get_coordinate(&record, "wgsy").unwrap() - 25.0418).abs() < f64::EPSILON);
        assert!((get_coordinate(&record, "wgsx").unwrap() - 121.5436).abs() < f64::EPSILON);
        assert!(get_coordinate(&record, "blank").is_none());
        assert!(get_coordinate(&record, "junk").is_none());
        assert!(get_coordinate(&record, "missing").is_none());
    }

    #[test]
    fn text_skips_empty_values() {
        let record = serde_json::json!({
            "中文單位名稱": "  ",
            "英文單位名稱": "Xinyi Precinct",
            "電話": 110,
        });
        let fields = ["中文單位名稱".to_string(), "英文單位名稱".to_string()];
        assert_eq!(first_text(&record, &fields).as_deref(), Some("Xinyi Precinct"));
        assert_eq!(get_text(&record, "電話").as_deref(), Some("110"));
        assert!(get_text(&record, "地址").is_none());
    }
}
