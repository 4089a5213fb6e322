use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::PosResult;

/// Menu section a [`MenuItem`] belongs to.
///
/// Closed enumeration: catalog input naming any other category is rejected
/// at parse time rather than mapped to a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Starters,
    Mains,
    Desserts,
    Beverages,
}

impl Category {
    /// Returns the lowercase wire code, e.g "mains"
    pub fn code(&self) -> &'static str {
        match self {
            Category::Starters => "starters",
            Category::Mains => "mains",
            Category::Desserts => "desserts",
            Category::Beverages => "beverages",
        }
    }

    pub fn supported() -> &'static [Category] {
        &[
            Category::Starters,
            Category::Mains,
            Category::Desserts,
            Category::Beverages,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::supported()
            .iter()
            .find(|c| c.code() == s)
            .copied()
            .ok_or_else(|| format!("unknown category: `{}`", s))
    }
}

fn default_available() -> bool {
    true
}

/// One entry of the menu catalog.
///
/// Supplied externally at startup and never mutated by the engine.
/// `available` is a display concern: the cart accepts unavailable items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

/// The read-only menu, insertion-ordered (first catalog entry stays first).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<MenuItem>,
}

impl Catalog {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// Parse a catalog from a JSON array of menu items.
    pub fn from_json(json: &str) -> PosResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().filter(move |i| i.category == category)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The built-in menu used when no catalog file is given.
    pub fn sample() -> Self {
        fn item(id: &str, name: &str, rupees: i64, category: Category) -> MenuItem {
            MenuItem {
                id: id.to_string(),
                name: name.to_string(),
                price: Decimal::new(rupees * 100, 2),
                category,
                description: None,
                available: true,
            }
        }
        Catalog::new(vec![
            item("paneer-tikka", "Paneer Tikka", 250, Category::Starters),
            item("veg-spring-rolls", "Veg Spring Rolls", 180, Category::Starters),
            item("chicken-65", "Chicken 65", 280, Category::Starters),
            item("butter-chicken", "Butter Chicken", 380, Category::Mains),
            item("dal-makhani", "Dal Makhani", 260, Category::Mains),
            item("veg-biryani", "Veg Biryani", 240, Category::Mains),
            item("garlic-naan", "Garlic Naan", 70, Category::Mains),
            item("gulab-jamun", "Gulab Jamun", 120, Category::Desserts),
            item("rasmalai", "Rasmalai", 140, Category::Desserts),
            item("masala-chai", "Masala Chai", 60, Category::Beverages),
            item("fresh-lime-soda", "Fresh Lime Soda", 80, Category::Beverages),
            item("mango-lassi", "Mango Lassi", 110, Category::Beverages),
        ])
    }
}
