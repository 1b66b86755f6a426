//! Forgiving numeric parsing.
//!
//! Records written during early character creation often hold numbers as
//! strings, blanks, or single-element arrays. A malformed number reads as
//! zero rather than failing the whole record. The same goes for enum
//! fields: a blank or unknown tag reads as the type's default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::shade::Shade;

/// Parse a string the way a form field would be read: leading integer
/// digits win, anything unparsable is zero, negatives clamp to zero.
pub fn parse_u32(s: &str) -> u32 {
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return clamp(n);
    }
    if let Ok(f) = s.parse::<f64>() {
        return from_float(f);
    }
    let digits: String = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '-'))
        .map(|(_, c)| c)
        .collect();
    digits.parse::<i64>().map(clamp).unwrap_or(0)
}

/// Read a loosely typed JSON value as a non-negative integer.
pub fn value_to_u32(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(clamp)
            .or_else(|| n.as_f64().map(from_float))
            .unwrap_or(0),
        Value::String(s) => parse_u32(s),
        Value::Array(items) => items.first().map(value_to_u32).unwrap_or(0),
        Value::Bool(_) | Value::Null | Value::Object(_) => 0,
    }
}

/// Serde adapter: `#[serde(deserialize_with = "lenient::u32_field")]`.
pub fn u32_field<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_u32).unwrap_or(0))
}

/// Serde adapter for enum fields: unknown or blank tags read as
/// `T::default()`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| T::deserialize(v).ok())
        .unwrap_or_default())
}

/// Serde adapter for shades. Accepts any case and `grey`; anything else is
/// Black.
pub fn shade_field<'de, D>(deserializer: D) -> Result<Shade, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(Shade::parse)
        .unwrap_or_default())
}

fn clamp(n: i64) -> u32 {
    n.clamp(0, i64::from(u32::MAX)) as u32
}

fn from_float(f: f64) -> u32 {
    if f.is_finite() && f > 0.0 {
        f.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
