//! Structured API error bodies.

use std::fmt;

use serde::Serialize;

use super::conversions::string_value;
use crate::value::{Number, Value};

/// One entry of an `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// Body of a failed request: `{"errors":[{"code":...,"message":...}]}`.
///
/// Errors keep the order the server sent them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorList {
    pub errors: Vec<FieldError>,
}

impl ErrorList {
    /// `None` unless `value` is a map with an `errors` array. Entries that
    /// are not maps are skipped; a code that is not numeric reads as `0`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let entries = value.get("errors")?.as_array()?;
        let errors = entries
            .iter()
            .filter_map(Value::as_map)
            .map(|entry| FieldError {
                code: match entry.get("code") {
                    Some(Value::Number(Number::Int(i))) => *i,
                    Some(Value::Number(Number::Float(f))) => f.trunc() as i64,
                    Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
                    _ => 0,
                },
                message: string_value(entry, "message").into_owned(),
            })
            .collect();
        Some(Self { errors })
    }

    /// Whether any entry carries `code`.
    pub fn has_code(&self, code: i64) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("api error with no details");
        }
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorList {}
