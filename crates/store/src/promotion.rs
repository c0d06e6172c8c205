//! Discount code rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{EntityId, Money};

/// How a promotion code discounts an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Percentage off the subtotal.
    Percentage,
    /// Fixed amount off the subtotal.
    Fixed,
}

impl DiscountType {
    /// Returns the type name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }

    /// Parses a stored type name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "percentage" => Some(DiscountType::Percentage),
            "fixed" => Some(DiscountType::Fixed),
            _ => None,
        }
    }
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discount code row.
///
/// Codes are stored upper-cased; lookups upper-case their input so matching
/// is effectively case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionCode {
    pub id: EntityId,
    pub code: String,
    pub discount_type: DiscountType,

    /// 0–100; meaningful only when `discount_type` is percentage.
    pub discount_percentage: u32,

    /// Meaningful only when `discount_type` is fixed.
    pub fixed_amount: Money,

    /// Monotonic counter of successful checkouts that used this code.
    pub usage_count: u32,

    /// Optional usage ceiling. `None` means unlimited.
    pub max_usage: Option<u32>,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl PromotionCode {
    /// Returns true if the usage ceiling has been reached.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.max_usage, Some(max) if self.usage_count >= max)
    }
}
