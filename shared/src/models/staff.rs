//! Staff Model

use serde::{Deserialize, Serialize};

/// Back-office user as returned by the user listings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Restaurant sub-role: `chef`, `staff`, `cashier`
    #[serde(default)]
    pub restaurant_role: Option<String>,
}

impl StaffMember {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }

    pub fn is_chef(&self) -> bool {
        self.restaurant_role.as_deref() == Some("chef")
    }

    /// Restaurant floor staff (role `restaurant`, sub-role `staff`)
    pub fn is_floor_staff(&self) -> bool {
        self.role.as_deref() == Some("restaurant") && self.restaurant_role.as_deref() == Some("staff")
    }
}
