//! HTTP route handlers.

pub mod admin;
pub mod checkout;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod promotions;

use ::checkout::{CheckoutService, PromotionResolver};
use store::ShopStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: ShopStore> {
    pub store: S,
    pub checkout_service: CheckoutService<S>,
    pub promotion_resolver: PromotionResolver<S>,
}
