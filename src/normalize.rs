//! Normalization of raw history documents into [`ShapeSeries`].
//!
//! Fetched documents arrive in one of three shapes: a flat object mapping
//! date-like strings to readings, an object nesting such a mapping under a
//! conventional key, or an array of [timestamp, reading] pairs. Readings may
//! be plain numbers or wrapped in a small object. Normalization never fails:
//! an entry that cannot be parsed is dropped, and a document with no usable
//! entries yields an empty series.

use crate::time_series::ShapeSeries;
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

/// Conventional keys under which a document may nest its date mapping.
const NESTED_KEYS: &[&str] = &["data", "values", "history", "series", "trend"];

/// Field names tried first when a reading is wrapped in an object.
const READING_KEYS: &[&str] = &["value", "y", "percentage", "percent", "vo2max"];

/// Epoch values at or above this magnitude are taken as milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

/// The recognized shapes of a raw history document.
enum DocumentShape<'a> {
    /// Flat mapping from date-like string to reading
    FlatMap(&'a Map<String, Value>),
    /// Array of [timestamp, reading] pairs
    Pairs(&'a [Value]),
    /// Anything else; normalizes to an empty series
    Opaque,
}

/// Classifies a document, resolving one level of conventional nesting.
fn classify(document: &Value) -> DocumentShape<'_> {
    match document {
        Value::Array(pairs) => DocumentShape::Pairs(pairs),
        Value::Object(map) => {
            for key in NESTED_KEYS {
                match map.get(*key) {
                    Some(Value::Object(inner)) => return DocumentShape::FlatMap(inner),
                    Some(Value::Array(inner)) => return DocumentShape::Pairs(inner),
                    _ => {}
                }
            }
            DocumentShape::FlatMap(map)
        }
        _ => DocumentShape::Opaque,
    }
}

/// Reduces a raw history document to a canonical series.
///
/// Pure and total: every malformed entry degrades to absence. Duplicate
/// calendar days in array form resolve last-by-array-order (later pairs
/// overwrite earlier ones).
pub fn normalize(document: &Value) -> ShapeSeries {
    let mut series = ShapeSeries::new();

    match classify(document) {
        DocumentShape::FlatMap(map) => {
            for (key, value) in map {
                if let (Some(day), Some(reading)) = (parse_day(key), unwrap_reading(value)) {
                    series.insert(day, reading);
                }
            }
        }
        DocumentShape::Pairs(pairs) => {
            for pair in pairs {
                let Some(items) = pair.as_array() else {
                    continue;
                };
                if items.len() < 2 {
                    continue;
                }
                if let (Some(day), Some(reading)) =
                    (timestamp_to_day(&items[0]), unwrap_reading(&items[1]))
                {
                    series.insert(day, reading);
                }
            }
        }
        DocumentShape::Opaque => {}
    }

    series
}

/// Parses a date-like key to a UTC calendar day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and stringified epoch values.
fn parse_day(key: &str) -> Option<NaiveDate> {
    if let Ok(day) = NaiveDate::parse_from_str(key, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(key) {
        return Some(instant.with_timezone(&chrono::Utc).date_naive());
    }
    key.parse::<f64>().ok().and_then(epoch_to_day)
}

/// Converts a pair timestamp (string or epoch number) to a UTC calendar day.
fn timestamp_to_day(timestamp: &Value) -> Option<NaiveDate> {
    match timestamp {
        Value::String(raw) => parse_day(raw),
        Value::Number(num) => num.as_f64().and_then(epoch_to_day),
        _ => None,
    }
}

/// Converts an epoch value (seconds or milliseconds, by magnitude) to a UTC
/// calendar day.
fn epoch_to_day(epoch: f64) -> Option<NaiveDate> {
    if !epoch.is_finite() {
        return None;
    }
    let seconds = if epoch.abs() >= EPOCH_MILLIS_THRESHOLD {
        epoch / 1000.0
    } else {
        epoch
    };
    DateTime::from_timestamp(seconds as i64, 0).map(|instant| instant.date_naive())
}

/// Unwraps a reading value.
///
/// Plain numbers pass through; objects yield the first embedded numeric
/// field under the recognized names, else the first numeric field in
/// document order. Readings outside [0, +inf) are dropped as malformed.
fn unwrap_reading(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(num) => num.as_f64(),
        Value::Object(map) => READING_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_f64))
            .or_else(|| map.values().find_map(Value::as_f64)),
        _ => None,
    };
    raw.filter(|reading| reading.is_finite() && *reading >= 0.0)
}
