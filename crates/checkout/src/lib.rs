//! Checkout orchestration for the gmshop storefront.
//!
//! [`PromotionResolver`] and [`ReferralResolver`] validate customer-supplied
//! codes against the store, and [`CheckoutService`] drives the checkout
//! sequence: price the cart, persist the order, then run the best-effort
//! side effects (promotion usage bump, referral credit).

pub mod error;
pub mod promotion;
pub mod referral;
pub mod service;

pub use error::CheckoutError;
pub use promotion::{AppliedPromotion, PromotionRejection, PromotionResolver};
pub use referral::{ReferralRejection, ReferralResolver};
pub use service::{
    CheckoutReceipt, CheckoutRequest, CheckoutService, FULFILLMENT_NOTE, SideEffectWarning,
};
