//! Persistence layer for the gmshop storefront.
//!
//! Defines the row types for the shop's tables, the [`ShopStore`] trait
//! that abstracts over the backend, and two implementations: an in-memory
//! store for tests and the default server, and a PostgreSQL store for
//! production deployments.

pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod product;
pub mod promotion;
pub mod query;
pub mod referral;
pub mod store;

pub use common::{EntityId, Money, OrderCode};
pub use error::{Result, StoreError};
pub use memory::InMemoryShopStore;
pub use order::{OrderLine, OrderRecord, OrderStatus};
pub use postgres::PostgresShopStore;
pub use product::{Category, Product};
pub use promotion::{DiscountType, PromotionCode};
pub use query::ProductQuery;
pub use referral::{CreditStatus, ReferralAccount, ReferralCreditEntry};
pub use store::{OrderStream, ShopStore, ShopStoreExt};
