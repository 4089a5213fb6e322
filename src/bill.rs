use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::OrderLine;

/// GST surcharge applied to every subtotal (18%).
pub const GST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Derived bill amounts for a set of order lines.
///
/// Never stored: recomputed from scratch on every cart change, so a stale
/// total cannot exist. Amounts keep full precision; call [`BillTotals::rounded`]
/// at the display boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillTotals {
    pub subtotal: Decimal,
    pub gst: Decimal,
    /// Reserved: always zero for now, no computation path exists yet.
    pub discount: Decimal,
    pub total: Decimal,
}

impl BillTotals {
    pub fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            gst: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    /// Two-place rounding for display. Internal math stays unrounded.
    pub fn rounded(&self) -> Self {
        fn dp2(value: Decimal) -> Decimal {
            let mut out = value.round_dp(2);
            out.rescale(2);
            out
        }
        Self {
            subtotal: dp2(self.subtotal),
            gst: dp2(self.gst),
            discount: dp2(self.discount),
            total: dp2(self.total),
        }
    }
}

/// Pure derivation: `total = subtotal + gst - discount`.
pub fn compute_totals(lines: &[OrderLine]) -> BillTotals {
    let subtotal: Decimal = lines.iter().map(OrderLine::line_total).sum();
    let gst = subtotal * GST_RATE;
    let discount = Decimal::ZERO;
    let total = subtotal + gst - discount;
    BillTotals {
        subtotal,
        gst,
        discount,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::menu::{Category, MenuItem};

    fn sample_item(id: &str, rupees: i64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: id.to_string(),
            price: Decimal::new(rupees * 100, 2),
            category: Category::Mains,
            description: None,
            available: true,
        }
    }

    #[test]
    fn test_totals_scenario_two_lines() {
        let a = sample_item("a", 100);
        let b = sample_item("b", 50);

        let mut cart = Cart::new();
        cart.add_item(&a);
        cart.add_item(&a);
        cart.add_item(&b);

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Decimal::new(250, 0));
        assert_eq!(totals.gst, Decimal::new(45, 0));
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::new(295, 0));
    }

    #[test]
    fn test_totals_identity_holds() {
        let mut cart = Cart::new();
        cart.add_item(&sample_item("a", 199));
        cart.add_item(&sample_item("b", 37));

        let totals = cart.totals();
        assert_eq!(totals.total, totals.subtotal + totals.gst - totals.discount);
        assert_eq!(totals.gst, totals.subtotal * GST_RATE);
    }

    #[test]
    fn test_totals_pure_and_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&sample_item("a", 120));

        let first = cart.totals();
        let second = cart.totals();
        assert_eq!(first, second);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_empty_cart_totals_all_zero() {
        let cart = Cart::new();
        let totals = cart.totals();
        assert_eq!(totals, BillTotals::zero());
    }

    #[test]
    fn test_rounding_only_at_display() {
        let mut cart = Cart::new();
        // 33.33 * 0.18 = 5.9994: full precision internally, 6.00 on display
        cart.add_item(&MenuItem {
            price: Decimal::new(3333, 2),
            ..sample_item("odd", 0)
        });

        let totals = cart.totals();
        assert_eq!(totals.gst, Decimal::new(59994, 4));
        assert_eq!(totals.rounded().gst, Decimal::new(600, 2));
    }
}
