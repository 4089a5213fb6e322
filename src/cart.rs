use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bill::{self, BillTotals};
use crate::menu::MenuItem;
use rust_decimal::Decimal;

/// One menu item plus the quantity of it requested in a cart.
///
/// A cart holds at most one line per distinct item id; `quantity` is always
/// at least 1 — a line whose quantity would drop to 0 is removed instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub item: MenuItem,
    pub quantity: u32,
    /// Free-text kitchen note ("no onions"). Reserved; nothing sets it yet
    /// except [`Cart::set_note`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OrderLine {
    pub fn line_total(&self) -> Decimal {
        self.item.price * Decimal::from(self.quantity)
    }
}

/// The current order being built: an insertion-ordered list of lines.
///
/// The first-added item stays first regardless of later quantity bumps.
/// Availability of an item is not checked here — greying out sold-out
/// entries is the rendering layer's job.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
    lines: Vec<OrderLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Bump the quantity of an existing line, or append a new line with
    /// quantity 1.
    pub fn add_item(&mut self, item: &MenuItem) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item.id == item.id) {
            line.quantity += 1;
            info!("cart: {} now x{}", item.id, line.quantity);
        } else {
            self.lines.push(OrderLine {
                item: item.clone(),
                quantity: 1,
                note: None,
            });
            info!("cart: added {}", item.id);
        }
    }

    /// Drop one unit of the item; the whole line goes once quantity hits 0.
    /// Unknown ids are a silent no-op — the UI only offers removal for lines
    /// it is already showing.
    pub fn remove_item(&mut self, id: &str) {
        let Some(pos) = self.lines.iter().position(|l| l.item.id == id) else {
            return;
        };
        if self.lines[pos].quantity > 1 {
            self.lines[pos].quantity -= 1;
            info!("cart: {} now x{}", id, self.lines[pos].quantity);
        } else {
            self.lines.remove(pos);
            info!("cart: removed {}", id);
        }
    }

    /// Attach or replace the free-text note on an existing line.
    /// Same silent-miss contract as [`Cart::remove_item`].
    pub fn set_note(&mut self, id: &str, note: impl Into<String>) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item.id == id) {
            line.note = Some(note.into());
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        info!("cart: cleared");
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines (the cart badge count).
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Recomputed from scratch on every call; see [`bill::compute_totals`].
    pub fn totals(&self) -> BillTotals {
        bill::compute_totals(&self.lines)
    }
}

//tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::Category;

    fn sample_item(id: &str, rupees: i64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: id.to_string(),
            price: Decimal::new(rupees * 100, 2),
            category: Category::Starters,
            description: None,
            available: true,
        }
    }

    /// Repeated adds merge into one line per distinct item id.
    #[test]
    fn test_add_merges_lines_by_id() {
        let a = sample_item("a", 100);
        let b = sample_item("b", 50);
        let mut cart = Cart::new();

        cart.add_item(&a);
        cart.add_item(&b);
        cart.add_item(&a);
        cart.add_item(&a);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.lines()[1].quantity, 1);
        assert_eq!(cart.item_count(), 4);
    }

    /// First-added item stays first even when a later item gets more adds.
    #[test]
    fn test_insertion_order_preserved() {
        let a = sample_item("a", 100);
        let b = sample_item("b", 50);
        let mut cart = Cart::new();

        cart.add_item(&a);
        cart.add_item(&b);
        cart.add_item(&b);
        cart.add_item(&b);

        assert_eq!(cart.lines()[0].item.id, "a");
        assert_eq!(cart.lines()[1].item.id, "b");
    }

    #[test]
    fn test_remove_decrements_then_deletes() {
        let a = sample_item("a", 100);
        let mut cart = Cart::new();

        cart.add_item(&a);
        cart.add_item(&a);
        cart.add_item(&a);

        cart.remove_item("a");
        cart.remove_item("a");
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.remove_item("a");
        assert!(cart.is_empty());
    }

    /// Removing an id that was never added leaves the cart untouched.
    #[test]
    fn test_remove_absent_id_is_noop() {
        let a = sample_item("a", 100);
        let mut cart = Cart::new();
        cart.add_item(&a);

        cart.remove_item("ghost");

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    /// A deleted line reappears at quantity 1 on re-add, not at its old count.
    #[test]
    fn test_readd_after_delete_starts_fresh() {
        let a = sample_item("a", 100);
        let mut cart = Cart::new();

        cart.add_item(&a);
        cart.remove_item("a");
        assert!(cart.is_empty());

        cart.add_item(&a);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_clear_empties_regardless_of_state() {
        let mut cart = Cart::new();
        cart.add_item(&sample_item("a", 100));
        cart.add_item(&sample_item("b", 50));
        cart.add_item(&sample_item("a", 100));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);

        // clearing an already-empty cart is fine too
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unavailable_item_still_accepted() {
        let mut sold_out = sample_item("a", 100);
        sold_out.available = false;
        let mut cart = Cart::new();

        cart.add_item(&sold_out);

        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_set_note_on_existing_line_only() {
        let a = sample_item("a", 100);
        let mut cart = Cart::new();
        cart.add_item(&a);

        cart.set_note("a", "extra spicy");
        cart.set_note("ghost", "ignored");

        assert_eq!(cart.lines()[0].note.as_deref(), Some("extra spicy"));
        assert_eq!(cart.len(), 1);
    }
}
