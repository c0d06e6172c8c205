//! Checkout errors.

use store::StoreError;

/// Errors that abort a checkout before an order is persisted.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("customer email is required")]
    EmptyEmail,

    #[error("failed to persist order: {0}")]
    Persistence(#[from] StoreError),
}
