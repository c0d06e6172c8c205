//! Shared value types for the gmshop storefront.
//!
//! These types are used across every layer: the store keeps them in rows,
//! the domain computes with them, and the API serializes them.

pub mod money;
pub mod order_code;
pub mod types;

pub use money::Money;
pub use order_code::OrderCode;
pub use types::EntityId;
