//! Lenient deserializers for backend records
//!
//! Records written by different screens disagree on field types: table and
//! room numbers arrive as strings or numbers, amounts occasionally as
//! strings, and dates either as `YYYY-MM-DD` or full RFC 3339 timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// String, number, or null as an owned string (null becomes empty)
pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Like [`string_or_number`], but empty values become `None`
pub fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let s = string_or_number(deserializer)?;
    Ok(if s.trim().is_empty() { None } else { Some(s) })
}

/// Number, numeric string, or null as f64 (anything else is zero)
pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

/// Optional f64 that also accepts numeric strings; blanks are `None`
pub fn opt_lenient_f64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    // Leading date of anything date-like ("2024-05-01T00:00:00" without zone)
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Optional calendar date from either date representation
pub fn flexible_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    Ok(match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_date(&raw),
        None => None,
    })
}

/// Optional timestamp; date-only values are taken as midnight UTC
pub fn flexible_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    Ok(parse_date(&raw)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc()))
}
