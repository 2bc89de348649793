//! Room and dining table models

use serde::{Deserialize, Serialize};

use crate::util::{lenient_f64, string_or_number};

/// Hotel room
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(
        alias = "room_number",
        alias = "roomNumber",
        default,
        deserialize_with = "string_or_number"
    )]
    pub number: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    /// Room category reference
    #[serde(alias = "categoryId", default)]
    pub category: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(alias = "is_reserved", default)]
    pub is_reserved: bool,
}

impl Room {
    /// Category id whether the record embeds the category or references it
    pub fn category_id(&self) -> Option<&str> {
        match self.category.as_ref()? {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Object(map) => map.get("_id").and_then(|v| v.as_str()),
            _ => None,
        }
    }
}

/// Room category (Deluxe, Suite, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCategory {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(alias = "categoryName", default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Restaurant dining table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(alias = "tableNo", default, deserialize_with = "string_or_number")]
    pub table_number: String,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_room_number_and_category() {
        let room: Room = serde_json::from_value(json!({
            "_id": "r1",
            "room_number": 101,
            "price": 2500,
            "categoryId": {"_id": "cat1", "name": "Deluxe"}
        }))
        .unwrap();
        assert_eq!(room.number, "101");
        assert_eq!(room.category_id(), Some("cat1"));
    }

    #[test]
    fn test_dining_table_number() {
        let table: DiningTable =
            serde_json::from_value(json!({"_id": "t1", "tableNumber": "T4", "capacity": 4}))
                .unwrap();
        assert_eq!(table.table_number, "T4");
        assert_eq!(table.capacity, Some(4));
    }
}
