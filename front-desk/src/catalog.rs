//! Catalog reader
//!
//! Read-through fetch of the reference data the order screens need. There is
//! no cache: every `load` hits the backend. A listing that fails to load is
//! replaced by an empty collection so the screens degrade to "no options".

use std::future::Future;

use pms_client::{HotelApi, HttpClient};
use shared::AppResult;
use shared::models::{
    Booking, Category, DiningTable, MenuItem, Room, RoomCategory, StaffMember, Vendor,
};

/// Snapshot of catalog listings
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub menu: Vec<MenuItem>,
    pub categories: Vec<Category>,
    pub rooms: Vec<Room>,
    pub room_categories: Vec<RoomCategory>,
    pub tables: Vec<DiningTable>,
    pub vendors: Vec<Vendor>,
    pub chefs: Vec<StaffMember>,
}

impl Catalog {
    pub fn with_menu(menu: Vec<MenuItem>) -> Self {
        Self {
            menu,
            ..Default::default()
        }
    }

    pub fn item_by_id(&self, id: &str) -> Option<&MenuItem> {
        find_by_id(&self.menu, id)
    }

    /// Case-insensitive exact name match
    pub fn item_by_name(&self, name: &str) -> Option<&MenuItem> {
        find_by_name(&self.menu, name)
    }

    /// Available items whose name contains `query` (case-insensitive)
    pub fn search(&self, query: &str) -> Vec<&MenuItem> {
        let query = query.trim().to_lowercase();
        self.menu
            .iter()
            .filter(|item| item.available)
            .filter(|item| query.is_empty() || item.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Available items of one category
    pub fn items_in_category(&self, category_id: &str) -> Vec<&MenuItem> {
        self.menu
            .iter()
            .filter(|item| item.available && item.category.as_deref() == Some(category_id))
            .collect()
    }

    pub fn room_category_name(&self, room: &Room) -> Option<&str> {
        let id = room.category_id()?;
        self.room_categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }
}

pub fn find_by_id<'a>(menu: &'a [MenuItem], id: &str) -> Option<&'a MenuItem> {
    menu.iter().find(|item| item.id == id)
}

pub fn find_by_name<'a>(menu: &'a [MenuItem], name: &str) -> Option<&'a MenuItem> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    menu.iter().find(|item| item.name.trim().eq_ignore_ascii_case(name))
}

/// Rooms of checked-in bookings, usable as order destinations
pub fn occupied_rooms(bookings: &[Booking]) -> Vec<String> {
    let mut rooms: Vec<String> = Vec::new();
    for booking in bookings.iter().filter(|b| b.is_checked_in()) {
        for room in booking.room_numbers() {
            if !rooms.iter().any(|r| r == room) {
                rooms.push(room.to_string());
            }
        }
    }
    rooms
}

/// Loads catalog listings through the typed API
#[derive(Debug, Clone)]
pub struct CatalogReader<H> {
    api: HotelApi<H>,
}

impl<H: HttpClient> CatalogReader<H> {
    pub fn new(api: HotelApi<H>) -> Self {
        Self { api }
    }

    /// Fetch every listing; failures degrade to empty collections
    pub async fn load(&self) -> Catalog {
        let (menu, categories, rooms, room_categories, tables, vendors, staff) = tokio::join!(
            or_empty("menu items", self.api.menu_items()),
            or_empty("restaurant categories", self.api.restaurant_categories()),
            or_empty("rooms", self.api.rooms()),
            or_empty("room categories", self.api.room_categories()),
            or_empty("dining tables", self.api.dining_tables()),
            or_empty("vendors", self.api.active_vendors()),
            or_empty("restaurant users", self.api.restaurant_users()),
        );

        let chefs: Vec<StaffMember> = staff.into_iter().filter(StaffMember::is_chef).collect();

        tracing::debug!(
            menu = menu.len(),
            categories = categories.len(),
            rooms = rooms.len(),
            tables = tables.len(),
            chefs = chefs.len(),
            "Catalog loaded"
        );

        Catalog {
            menu,
            categories,
            rooms,
            room_categories,
            tables,
            vendors,
            chefs,
        }
    }

    /// Menu only, degrading to empty
    pub async fn menu(&self) -> Vec<MenuItem> {
        or_empty("menu items", self.api.menu_items()).await
    }

    /// Rooms currently occupied by checked-in guests
    pub async fn occupied_rooms(&self) -> Vec<String> {
        occupied_rooms(&or_empty("bookings", self.api.bookings()).await)
    }
}

async fn or_empty<T>(what: &str, fut: impl Future<Output = AppResult<Vec<T>>>) -> Vec<T> {
    match fut.await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(listing = what, error = %e, "Listing unavailable, using empty collection");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pms_client::testing::MockHttpClient;
    use serde_json::json;
    use shared::http::{Method, StatusCode};

    fn item(id: &str, name: &str, price: f64) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: name.into(),
            price,
            available: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_lookups() {
        let catalog = Catalog::with_menu(vec![
            item("m1", "Paneer Tikka", 220.0),
            item("m2", "Masala Dosa", 90.0),
        ]);
        assert_eq!(catalog.item_by_id("m2").map(|i| i.price), Some(90.0));
        assert_eq!(
            catalog.item_by_name("paneer tikka").map(|i| i.id.as_str()),
            Some("m1")
        );
        assert!(catalog.item_by_name("  ").is_none());
        assert_eq!(catalog.search("DOSA").len(), 1);
        assert_eq!(catalog.search("").len(), 2);
    }

    #[test]
    fn test_occupied_rooms_only_checked_in() {
        let bookings: Vec<Booking> = serde_json::from_value(json!([
            {"_id": "b1", "roomNumber": "101, 102", "status": "Checked In"},
            {"_id": "b2", "roomNumber": "201", "status": "Booked"},
            {"_id": "b3", "roomNumber": "102,103", "status": "Checked In"}
        ]))
        .unwrap();
        assert_eq!(occupied_rooms(&bookings), vec!["101", "102", "103"]);
    }

    #[tokio::test]
    async fn test_failed_listings_degrade_to_empty() {
        let mock = MockHttpClient::new();
        mock.on(
            Method::GET,
            "/api/items/all",
            json!({"items": [{"_id": "m1", "name": "Tea", "price": 20}]}),
        )
        .fail(
            Method::GET,
            "/api/vendors/active",
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom",
        )
        .on(
            Method::GET,
            "/api/search/field?model=users&field=role&value=restaurant",
            json!({"users": [
                {"_id": "u1", "username": "ravi", "restaurantRole": "chef"},
                {"_id": "u2", "username": "asha", "restaurantRole": "staff"}
            ]}),
        );

        let reader = CatalogReader::new(HotelApi::new(mock));
        let catalog = reader.load().await;

        assert_eq!(catalog.menu.len(), 1);
        assert!(catalog.vendors.is_empty());
        assert!(catalog.tables.is_empty());
        assert_eq!(catalog.chefs.len(), 1);
        assert_eq!(catalog.chefs[0].username, "ravi");
    }
}
