//! Lenient conversion of loosely typed body fields.
//!
//! Listing bodies arrive either as JSON or as multipart text fields, so a
//! number may be `3` or `"3"` and a list may be an array, a JSON array
//! string or a comma-separated string. Every reader returns a [`Patch`]:
//! an absent key is unchanged, `null` or a blank string clears.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use estatehub_core::{AppError, AppResult};
use estatehub_entity::Patch;
use estatehub_entity::listing::parse_feature_list;

/// A listing body as a flat key/value map.
pub type Fields = Map<String, Value>;

fn blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Free text.
pub fn text(fields: &Fields, key: &str) -> AppResult<Patch<String>> {
    let Some(value) = fields.get(key) else {
        return Ok(Patch::Unchanged);
    };
    if blank(value) {
        return Ok(Patch::Clear);
    }
    match value {
        Value::String(s) => Ok(Patch::Set(s.trim().to_string())),
        Value::Number(n) => Ok(Patch::Set(n.to_string())),
        Value::Bool(b) => Ok(Patch::Set(b.to_string())),
        _ => Err(AppError::validation(format!("Field '{key}' must be text"))),
    }
}

/// A decimal number.
pub fn decimal(fields: &Fields, key: &str) -> AppResult<Patch<f64>> {
    let Some(value) = fields.get(key) else {
        return Ok(Patch::Unchanged);
    };
    if blank(value) {
        return Ok(Patch::Clear);
    }
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    };
    parsed
        .map(Patch::Set)
        .ok_or_else(|| AppError::validation(format!("Field '{key}' must be a number")))
}

/// A whole number.
pub fn integer(fields: &Fields, key: &str) -> AppResult<Patch<i32>> {
    match decimal(fields, key)? {
        Patch::Unchanged => Ok(Patch::Unchanged),
        Patch::Clear => Ok(Patch::Clear),
        Patch::Set(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => {
            Ok(Patch::Set(f as i32))
        }
        Patch::Set(_) => Err(AppError::validation(format!(
            "Field '{key}' must be a whole number"
        ))),
    }
}

/// A value parsed with [`FromStr`].
pub fn parsed<T>(fields: &Fields, key: &str) -> AppResult<Patch<T>>
where
    T: FromStr<Err = AppError>,
{
    match text(fields, key)? {
        Patch::Unchanged => Ok(Patch::Unchanged),
        Patch::Clear => Ok(Patch::Clear),
        Patch::Set(s) => s.parse().map(Patch::Set),
    }
}

/// An RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
pub fn timestamp(fields: &Fields, key: &str) -> AppResult<Patch<DateTime<Utc>>> {
    match text(fields, key)? {
        Patch::Unchanged => Ok(Patch::Unchanged),
        Patch::Clear => Ok(Patch::Clear),
        Patch::Set(s) => parse_timestamp(&s)
            .map(Patch::Set)
            .ok_or_else(|| AppError::validation(format!("Field '{key}' must be a date"))),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Feature tags: an array, a JSON array string or a comma-separated string.
pub fn features(fields: &Fields, key: &str) -> AppResult<Patch<Vec<String>>> {
    let Some(value) = fields.get(key) else {
        return Ok(Patch::Unchanged);
    };
    match value {
        Value::Null => Ok(Patch::Clear),
        Value::Array(items) => string_items(key, items).map(Patch::Set),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[') {
                let items: Vec<Value> = serde_json::from_str(trimmed).map_err(|_| {
                    AppError::validation(format!("Field '{key}' is not a valid list"))
                })?;
                string_items(key, &items).map(Patch::Set)
            } else {
                Ok(Patch::Set(parse_feature_list(trimmed)))
            }
        }
        _ => Err(AppError::validation(format!("Field '{key}' must be a list"))),
    }
}

/// Body images: an array, a JSON array string or a single entry.
///
/// Entries are never split on commas since data URIs contain them.
pub fn images(fields: &Fields, key: &str) -> AppResult<Patch<Vec<String>>> {
    let Some(value) = fields.get(key) else {
        return Ok(Patch::Unchanged);
    };
    match value {
        Value::Null => Ok(Patch::Clear),
        Value::Array(items) => string_items(key, items).map(Patch::Set),
        Value::String(s) if s.trim_start().starts_with('[') => {
            let items: Vec<Value> = serde_json::from_str(s.trim())
                .map_err(|_| AppError::validation(format!("Field '{key}' is not a valid list")))?;
            string_items(key, &items).map(Patch::Set)
        }
        Value::String(s) if s.trim().is_empty() => Ok(Patch::Set(Vec::new())),
        Value::String(s) => Ok(Patch::Set(vec![s.trim().to_string()])),
        _ => Err(AppError::validation(format!("Field '{key}' must be a list"))),
    }
}

fn string_items(key: &str, items: &[Value]) -> AppResult<Vec<String>> {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.trim().to_string()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(AppError::validation(format!(
                "Field '{key}' must contain only text"
            ))),
        })
        .filter(|item| !matches!(item, Ok(s) if s.is_empty()))
        .collect()
}

/// Collapse a patch into the optional value of a create request.
pub fn into_option<T>(patch: Patch<T>) -> Option<T> {
    match patch {
        Patch::Set(v) => Some(v),
        Patch::Unchanged | Patch::Clear => None,
    }
}
