//! Menu Model

use serde::{Deserialize, Serialize};

use crate::util::{lenient_f64, string_or_number};

/// Purchasable catalog item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(alias = "itemName", default)]
    pub name: String,
    #[serde(alias = "Price", default, deserialize_with = "lenient_f64")]
    pub price: f64,
    /// Category reference; populated records carry the category object
    #[serde(default, deserialize_with = "category_ref")]
    pub category: Option<String>,
    /// Preparation time in minutes
    #[serde(alias = "timeToPrepare", default, deserialize_with = "lenient_f64")]
    pub prep_time: f64,
    #[serde(default)]
    pub food_type: Option<String>,
    #[serde(alias = "isAvailable", default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

/// Category as an id string, or the `_id`/`name` of an embedded object
fn category_ref<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    use serde_json::Value;
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Object(map) => map
            .get("_id")
            .or_else(|| map.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}

/// Restaurant menu category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(alias = "categoryName", default, deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
