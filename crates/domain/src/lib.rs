//! Cart and pricing rules for the gmshop storefront.
//!
//! The [`Cart`] aggregate enforces stock caps when lines are added or
//! changed, and [`pricing`] applies promotion effects to a cart subtotal.

pub mod cart;
pub mod pricing;

pub use cart::{Cart, CartLine, CartNotice};
pub use pricing::{PricedTotals, PromotionEffect, discount_amount};
