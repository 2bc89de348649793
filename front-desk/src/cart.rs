//! Cart aggregator
//!
//! Client-local list of selected menu items. Pure in-memory state: no
//! backend interaction, no failure modes.

use rust_decimal::Decimal;
use serde::Serialize;

use shared::models::{MenuItem, OrderItemInput};
use shared::money;

/// A selected item pending submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    /// Catalog price at the time the item was added
    pub unit_price: f64,
    /// Manual price override
    pub custom_price: Option<f64>,
    /// Always >= 1
    pub quantity: u32,
    pub note: String,
}

impl CartLine {
    fn from_item(item: &MenuItem) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            custom_price: None,
            quantity: 1,
            note: String::new(),
        }
    }

    /// `custom_price ?? unit_price`
    pub fn effective_price(&self) -> f64 {
        self.custom_price.unwrap_or(self.unit_price)
    }

    pub fn line_total(&self) -> Decimal {
        money::line_total(self.effective_price(), self.quantity)
    }

    fn to_input(&self) -> OrderItemInput {
        OrderItemInput {
            item_id: self.item_id.clone(),
            item_name: self.name.clone(),
            price: self.effective_price(),
            quantity: self.quantity,
            note: self.note.clone(),
        }
    }
}

/// Selected lines plus the open/closed state of the cart panel
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    open: bool,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one of `item`; bumps the quantity when already present
    pub fn add_item(&mut self, item: &MenuItem) {
        match self.line_mut(&item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::from_item(item)),
        }
    }

    /// Adjust a quantity by `delta`, flooring at 1
    ///
    /// Returns false when the item is not in the cart.
    pub fn change_quantity(&mut self, item_id: &str, delta: i64) -> bool {
        match self.line_mut(item_id) {
            Some(line) => {
                let next = (i64::from(line.quantity) + delta).clamp(1, i64::from(u32::MAX));
                line.quantity = u32::try_from(next).unwrap_or(1);
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.item_id != item_id);
        self.lines.len() != before
    }

    pub fn set_custom_price(&mut self, item_id: &str, price: Option<f64>) -> bool {
        match self.line_mut(item_id) {
            Some(line) => {
                line.custom_price = price.filter(|p| p.is_finite() && *p >= 0.0);
                true
            }
            None => false,
        }
    }

    pub fn set_note(&mut self, item_id: &str, note: impl Into<String>) -> bool {
        match self.line_mut(item_id) {
            Some(line) => {
                line.note = note.into();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Σ effective price × quantity
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Per-line notes joined as `name: note`
    pub fn combined_notes(&self) -> String {
        self.lines
            .iter()
            .filter(|l| !l.note.trim().is_empty())
            .map(|l| format!("{}: {}", l.name, l.note.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn to_inputs(&self) -> Vec<OrderItemInput> {
        self.lines.iter().map(CartLine::to_input).collect()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn line_mut(&mut self, item_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.item_id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: format!("Item {}", id),
            price,
            available: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_add_twice_increments() {
        let mut cart = Cart::new();
        let tea = item("tea", 20.0);
        cart.add_item(&tea);
        cart.add_item(&tea);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total(), Decimal::from(40));
    }

    #[test]
    fn test_quantity_floors_at_one() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", 10.0));
        assert!(cart.change_quantity("a", -5));
        assert_eq!(cart.lines()[0].quantity, 1);
        assert!(cart.change_quantity("a", 3));
        assert_eq!(cart.lines()[0].quantity, 4);
        assert!(!cart.change_quantity("missing", 1));
    }

    #[test]
    fn test_total_uses_custom_price() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", 100.0));
        cart.add_item(&item("a", 100.0));
        cart.add_item(&item("b", 50.0));
        assert_eq!(cart.total(), Decimal::from(250));

        cart.set_custom_price("b", Some(30.0));
        assert_eq!(cart.total(), Decimal::from(230));
        cart.set_custom_price("b", None);
        assert_eq!(cart.total(), Decimal::from(250));
    }

    #[test]
    fn test_total_matches_surviving_lines_after_mixed_ops() {
        let mut cart = Cart::new();
        let items = [item("a", 12.5), item("b", 7.25), item("c", 99.99)];
        for (step, delta) in [1i64, -3, 2, 0, -1, 5].iter().enumerate() {
            let it = &items[step % items.len()];
            cart.add_item(it);
            cart.change_quantity(&it.id, *delta);
            if step == 4 {
                cart.remove_item("b");
            }
            assert!(cart.lines().iter().all(|l| l.quantity >= 1));
            let expected: Decimal = cart
                .lines()
                .iter()
                .map(|l| money::to_decimal(l.unit_price) * Decimal::from(l.quantity))
                .sum();
            assert_eq!(cart.total(), expected);
        }
    }

    #[test]
    fn test_notes_and_inputs() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", 10.0));
        cart.add_item(&item("b", 5.0));
        cart.set_note("a", "less spicy");
        assert_eq!(cart.combined_notes(), "Item a: less spicy");

        let inputs = cart.to_inputs();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].note, "less spicy");
        assert_eq!(inputs[1].price, 5.0);
    }
}
