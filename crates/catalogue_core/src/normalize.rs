//! crates/catalogue_core/src/normalize.rs
//!
//! Payload normalisation shared by the views.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

/// Converts a `genres` payload into an ordered list of names.
///
/// A keyed mapping yields its values with integer-like keys first, ascending,
/// followed by the remaining keys in lexicographic key order (the order of
/// `serde_json::Map`). An array is taken as-is and anything else (absent, null)
/// yields an empty list.
pub fn genre_values(raw: Option<Value>) -> Vec<String> {
    match raw {
        Some(Value::Object(map)) => {
            let mut entries: Vec<(Option<u64>, String)> = map
                .into_iter()
                .map(|(key, value)| (key.parse::<u64>().ok(), value_to_string(value)))
                .collect();
            // Stable sort keeps non-numeric keys in map order, which is sorted by key.
            entries.sort_by(|(a, _), (b, _)| match (a, b) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
            entries.into_iter().map(|(_, name)| name).collect()
        }
        Some(Value::Array(items)) => items.into_iter().map(value_to_string).collect(),
        _ => Vec::new(),
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Parses a release date given either as an RFC 3339 timestamp or as `YYYY-MM-DD`.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.naive_utc().date())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .or_else(|| {
            // Timestamps without an offset, e.g. "2020-05-01T10:00:00".
            raw.split_once('T')
                .and_then(|(date, _)| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        })
}

/// Renders a release date the way the edit form's date input expects it.
pub fn date_field(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Normalises a raw `release_date` string to a calendar date with no time component.
/// Unparseable input yields an empty field.
pub fn release_date_field(raw: &str) -> String {
    date_field(parse_release_date(raw))
}
