//! Coercing field readers over a [`Map`].
//!
//! Every reader takes a map and a key and returns the field if it is present
//! with a compatible type, or a documented zero value otherwise. None of them
//! can fail: a single missing or retyped field must never sink a whole
//! response.

use std::borrow::Cow;

use lazy_static::lazy_static;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::value::{Map, Number, Value};

/// Returned by [`i32_value`] when the field holds a number that cannot be
/// narrowed to 32 bits without guessing.
pub const I32_AMBIGUOUS: i32 = -1;

lazy_static! {
    static ref EMPTY_MAP: Map = Map::new();
}

/// String field. Numbers and booleans are rendered as text (`1234`, `1.5`,
/// `true`). Anything else gives `""`.
pub fn string_value<'a>(map: &'a Map, key: &str) -> Cow<'a, str> {
    match map.get(key) {
        Some(Value::String(s)) => Cow::Borrowed(s),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
        _ => Cow::Borrowed(""),
    }
}

/// Boolean field, `false` when absent or not a bool.
pub fn bool_value(map: &Map, key: &str) -> bool {
    matches!(map.get(key), Some(Value::Bool(true)))
}

/// 64-bit integer field.
///
/// A float is truncated toward zero (and saturates at the `i64` bounds).
/// This is lossy: read [`f64_value`] when the fraction matters. Anything
/// else gives `0`.
pub fn i64_value(map: &Map, key: &str) -> i64 {
    match map.get(key) {
        Some(Value::Number(Number::Int(i))) => *i,
        Some(Value::Number(Number::Float(f))) => f.trunc() as i64,
        _ => 0,
    }
}

/// 64-bit float field. Integers are widened. Anything else gives `0.0`.
pub fn f64_value(map: &Map, key: &str) -> f64 {
    match map.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        _ => 0.0,
    }
}

/// 32-bit integer field.
///
/// Integers inside the `i32` range are narrowed. Integers outside it and any
/// float give [`I32_AMBIGUOUS`]. Anything else gives `0`.
pub fn i32_value(map: &Map, key: &str) -> i32 {
    match map.get(key) {
        Some(Value::Number(Number::Int(i))) => i32::try_from(*i).unwrap_or(I32_AMBIGUOUS),
        Some(Value::Number(Number::Float(_))) => I32_AMBIGUOUS,
        _ => 0,
    }
}

/// Unsigned ID field.
///
/// Prefers the `"<key>_str"` twin the API sends next to every numeric ID,
/// then falls back to a non-negative integer (or digit string) under `key`.
/// Unparsable IDs give `0`.
pub fn u64_id_value(map: &Map, key: &str) -> u64 {
    let str_key = format!("{key}_str");
    if let Some(id) = map
        .get(&str_key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<u64>().ok())
    {
        return id;
    }
    match map.get(key) {
        Some(Value::Number(Number::Int(i))) => u64::try_from(*i).unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Array field, empty slice when absent or not an array.
pub fn array_value<'a>(map: &'a Map, key: &str) -> &'a [Value] {
    map.get(key).and_then(Value::as_array).unwrap_or(&[])
}

/// Map field, a shared empty map when absent or not a map.
pub fn map_value<'a>(map: &'a Map, key: &str) -> &'a Map {
    map.get(key).and_then(Value::as_map).unwrap_or(&*EMPTY_MAP)
}

/// Timestamp field in the API's `created_at` format, e.g.
/// `Thu Sep 20 20:08:32 +0000 2012`. Unparsable or missing values give
/// [`OffsetDateTime::UNIX_EPOCH`].
pub fn time_value(map: &Map, key: &str) -> OffsetDateTime {
    map.get(key)
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Parse the API's `created_at` timestamp format.
pub fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    let format = format_description!(
        "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
    );
    OffsetDateTime::parse(text, format).ok()
}

/// `[start, end]` index pair used by entities, `(0, 0)` when malformed.
pub fn indices_value(map: &Map, key: &str) -> (i64, i64) {
    match array_value(map, key) {
        [Value::Number(Number::Int(start)), Value::Number(Number::Int(end))] => (*start, *end),
        _ => (0, 0),
    }
}
