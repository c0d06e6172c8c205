//! Catalog product rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{EntityId, Money};

/// Product category in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Gaming accounts.
    Accounts,
    /// Recurring subscriptions.
    Subscriptions,
    /// In-game add-ons.
    Addons,
}

impl Category {
    /// Returns the category name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Accounts => "accounts",
            Category::Subscriptions => "subscriptions",
            Category::Addons => "addons",
        }
    }

    /// Parses a stored category name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accounts" => Some(Category::Accounts),
            "subscriptions" => Some(Category::Subscriptions),
            "addons" => Some(Category::Addons),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalog product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub image_url: String,

    /// Current selling price. This is the price that enters totals.
    pub price: Money,

    /// Struck-through display price. Never enters computed totals.
    pub original_price: Option<Money>,

    /// Whether to render `original_price` as a discount. Display only.
    pub show_fake_discount: bool,

    /// Units on hand. Only meaningful when `track_stock` is true.
    pub stock_quantity: u32,

    /// If false, cart quantities for this product are unconstrained.
    pub track_stock: bool,

    /// Display threshold for the low-stock badge.
    pub low_stock_threshold: u32,

    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns true if the product cannot be added to a cart at all.
    pub fn is_out_of_stock(&self) -> bool {
        self.track_stock && self.stock_quantity == 0
    }

    /// Returns true if the low-stock badge should be shown.
    pub fn is_low_stock(&self) -> bool {
        self.track_stock
            && self.stock_quantity > 0
            && self.stock_quantity <= self.low_stock_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(track_stock: bool, stock_quantity: u32, low_stock_threshold: u32) -> Product {
        Product {
            id: EntityId::new(),
            name: "Test Account".to_string(),
            description: "A test product".to_string(),
            category: Category::Accounts,
            image_url: "https://example.com/img.png".to_string(),
            price: Money::from_dinars(1500),
            original_price: None,
            show_fake_discount: false,
            stock_quantity,
            track_stock,
            low_stock_threshold,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn out_of_stock_requires_tracking() {
        assert!(product(true, 0, 5).is_out_of_stock());
        assert!(!product(false, 0, 5).is_out_of_stock());
        assert!(!product(true, 3, 5).is_out_of_stock());
    }

    #[test]
    fn low_stock_uses_threshold() {
        assert!(product(true, 3, 5).is_low_stock());
        assert!(product(true, 5, 5).is_low_stock());
        assert!(!product(true, 6, 5).is_low_stock());
        assert!(!product(true, 0, 5).is_low_stock());
        assert!(!product(false, 3, 5).is_low_stock());
    }

    #[test]
    fn category_parse_roundtrip() {
        for cat in [Category::Accounts, Category::Subscriptions, Category::Addons] {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(Category::parse("weapons"), None);
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Subscriptions).unwrap();
        assert_eq!(json, "\"subscriptions\"");
    }

    #[test]
    fn product_serialization_roundtrip() {
        let p = product(true, 10, 5);
        let json = serde_json::to_string(&p).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
