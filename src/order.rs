use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bill::BillTotals;
use crate::cart::{Cart, OrderLine};
use crate::errors::{PosError, PosResult};

/// Whether the order is eaten on-premises or taken off-site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    DineIn,
    Takeaway,
}

impl OrderType {
    pub fn code(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine-in",
            OrderType::Takeaway => "takeaway",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for OrderType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dine-in" => Ok(OrderType::DineIn),
            "takeaway" => Ok(OrderType::Takeaway),
            _ => Err(format!("unknown order type: `{}`", s)),
        }
    }
}

/// Kitchen lifecycle of an order. The factory only ever emits `Pending`;
/// `Completed` is reached through [`select_payment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for PaymentMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            _ => Err(format!("unknown payment method: `{}`", s)),
        }
    }
}

/// Immutable snapshot of a cart at checkout time.
///
/// The lines and totals are copies: later cart mutations cannot reach back
/// into an order that was already placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub order_type: OrderType,
    pub lines: Vec<OrderLine>,
    pub totals: BillTotals,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Snapshot the cart into a new `Pending` order.
///
/// The one validation rule of the whole core: an empty cart cannot be
/// checked out. The cart itself is left untouched — clearing it after the
/// order is accepted downstream is the caller's job.
pub fn create_order(cart: &Cart, order_type: OrderType) -> PosResult<Order> {
    if cart.is_empty() {
        return Err(PosError::EmptyCart);
    }
    Ok(Order {
        id: next_order_id(),
        order_type,
        lines: cart.lines().to_vec(),
        totals: cart.totals(),
        status: OrderStatus::Pending,
        created_at: Utc::now(),
    })
}

// Process-unique; the short receipt form the counter staff reads out.
fn next_order_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", &uuid[..8])
}

/// What the terminal shows once a payment method is chosen.
///
/// No processing happens here: no amount tendered, no change. `total` is
/// what the order already owed, rounded for the receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub order_id: String,
    pub method: PaymentMethod,
    pub total: Decimal,
    pub paid_at: DateTime<Utc>,
}

/// Record the chosen payment method and close out the order.
///
/// Settling the bill is the end of the order's life at the terminal, so the
/// status moves straight to `Completed` here.
pub fn select_payment(order: &mut Order, method: PaymentMethod) -> PaymentReceipt {
    order.status = OrderStatus::Completed;
    PaymentReceipt {
        order_id: order.id.clone(),
        method,
        total: order.totals.rounded().total,
        paid_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_empty_cart_is_rejected() {
        let cart = Cart::new();
        let err = create_order(&cart, OrderType::DineIn).unwrap_err();
        assert!(matches!(err, PosError::EmptyCart));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_order_snapshots_cart_at_creation() {
        let mut cart = Cart::new();
        cart.add_item(&sample_item("a", 100));
        cart.add_item(&sample_item("a", 100));

        let order = create_order(&cart, OrderType::Takeaway).unwrap();

        // mutating the cart afterwards must not reach into the order
        cart.clear();
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 2);
        assert_eq!(order.totals.subtotal, Decimal::new(200, 0));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.order_type, OrderType::Takeaway);
    }

    #[test]
    fn test_creation_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add_item(&sample_item("a", 100));

        let _ = create_order(&cart, OrderType::DineIn).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_order_ids_unique() {
        let mut cart = Cart::new();
        cart.add_item(&sample_item("a", 100));

        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let order = create_order(&cart, OrderType::DineIn).unwrap();
            assert!(order.id.starts_with("ORD-"));
            assert!(seen.insert(order.id));
        }
    }

    #[test]
    fn test_payment_completes_order() {
        let mut cart = Cart::new();
        cart.add_item(&sample_item("a", 100));
        let mut order = create_order(&cart, OrderType::DineIn).unwrap();

        let receipt = select_payment(&mut order, PaymentMethod::Upi);

        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(receipt.order_id, order.id);
        assert_eq!(receipt.method, PaymentMethod::Upi);
        assert_eq!(receipt.total, Decimal::new(11800, 2));
    }

    #[test]
    fn test_wire_codes_roundtrip() {
        assert_eq!("dine-in".parse::<OrderType>().unwrap(), OrderType::DineIn);
        assert_eq!(OrderType::Takeaway.to_string(), "takeaway");
        assert_eq!("upi".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert!("crypto".parse::<PaymentMethod>().is_err());
    }
}
