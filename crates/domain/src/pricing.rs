//! Promotion pricing rules.
//!
//! A promotion effect is either a percentage off the cart subtotal or a
//! fixed amount. The total is the subtotal minus the discount with no
//! floor; a fixed discount larger than the subtotal produces a negative
//! total, which the back office settles manually.

use common::Money;
use serde::{Deserialize, Serialize};
use store::{DiscountType, PromotionCode};

/// The discount a resolved promotion code applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PromotionEffect {
    /// Percentage of the subtotal, truncated to whole minor units.
    Percentage(u32),
    /// Fixed amount, independent of the subtotal.
    Fixed(Money),
}

impl PromotionEffect {
    /// Reads the effect off a stored promotion row.
    pub fn from_code(code: &PromotionCode) -> Self {
        match code.discount_type {
            DiscountType::Percentage => Self::Percentage(code.discount_percentage),
            DiscountType::Fixed => Self::Fixed(code.fixed_amount),
        }
    }
}

/// Discount a promotion effect yields against a subtotal.
pub fn discount_amount(subtotal: Money, effect: PromotionEffect) -> Money {
    match effect {
        PromotionEffect::Percentage(percent) => subtotal.percent(percent),
        PromotionEffect::Fixed(amount) => amount,
    }
}

/// Priced cart totals after an optional promotion is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

impl PricedTotals {
    /// Prices a subtotal with an optional promotion effect.
    ///
    /// The total is not clamped at zero.
    pub fn price(subtotal: Money, effect: Option<PromotionEffect>) -> Self {
        let discount = effect
            .map(|effect| discount_amount(subtotal, effect))
            .unwrap_or_else(Money::zero);
        Self {
            subtotal,
            discount,
            total: subtotal - discount,
        }
    }
}
