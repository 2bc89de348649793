//! Tolerant response unwrapping
//!
//! The backend is inconsistent about envelopes: the same listing may come
//! back as a bare array, as `{bookings: [...]}`, or as
//! `{success: true, data: [...]}`. These helpers try the bare shape first and
//! then each wrapper key in turn.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Wrapper keys tried by every lookup after the caller's own keys
const GENERIC_KEYS: &[&str] = &["data", "result"];

/// Deserialize a single object, unwrapping the first matching key
pub fn extract<T: DeserializeOwned>(value: Value, keys: &[&str]) -> AppResult<T> {
    if let Value::Object(map) = &value {
        for key in keys.iter().chain(GENERIC_KEYS) {
            if let Some(inner) = map.get(*key)
                && inner.is_object()
            {
                return serde_json::from_value(inner.clone()).map_err(AppError::from);
            }
        }
    }
    serde_json::from_value(value).map_err(AppError::from)
}

/// Deserialize a list, accepting a bare array or an object wrapping one
///
/// `null` and a wrapper without any of the keys yield an empty list.
pub fn extract_list<T: DeserializeOwned>(value: Value, keys: &[&str]) -> AppResult<Vec<T>> {
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(AppError::from),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) => {
            for key in keys.iter().chain(GENERIC_KEYS) {
                if let Some(inner @ Value::Array(_)) = map.remove(*key) {
                    return serde_json::from_value(inner).map_err(AppError::from);
                }
            }
            Ok(Vec::new())
        }
        other => Err(AppError::invalid_response(format!(
            "expected a list, got {}",
            other
        ))),
    }
}

/// Read `{success: false, message}` replies that arrive with a 2xx status
pub fn failure_message(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    if map.get("success").and_then(Value::as_bool) == Some(false) {
        let message = map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request failed");
        return Some(message.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_extract_bare_and_wrapped() {
        let bare: Named = extract(json!({"name": "a"}), &["checkout"]).unwrap();
        assert_eq!(bare.name, "a");

        let wrapped: Named = extract(json!({"checkout": {"name": "b"}}), &["checkout"]).unwrap();
        assert_eq!(wrapped.name, "b");

        let generic: Named = extract(json!({"success": true, "data": {"name": "c"}}), &[]).unwrap();
        assert_eq!(generic.name, "c");
    }

    #[test]
    fn test_extract_list_shapes() {
        let bare: Vec<Named> = extract_list(json!([{"name": "a"}]), &["bookings"]).unwrap();
        assert_eq!(bare.len(), 1);

        let wrapped: Vec<Named> =
            extract_list(json!({"bookings": [{"name": "a"}, {"name": "b"}]}), &["bookings"])
                .unwrap();
        assert_eq!(wrapped.len(), 2);

        let missing: Vec<Named> = extract_list(json!({"other": 1}), &["bookings"]).unwrap();
        assert!(missing.is_empty());

        let null: Vec<Named> = extract_list(Value::Null, &[]).unwrap();
        assert!(null.is_empty());

        assert!(extract_list::<Named>(json!("nope"), &[]).is_err());
    }

    #[test]
    fn test_failure_message() {
        assert_eq!(
            failure_message(&json!({"success": false, "message": "GST number not found"})),
            Some("GST number not found".to_string())
        );
        assert_eq!(failure_message(&json!({"success": true})), None);
        assert_eq!(failure_message(&json!([1, 2])), None);
    }
}
