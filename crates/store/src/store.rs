use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;
use futures_util::TryStreamExt;

use common::{EntityId, Money};

use crate::{
    CreditStatus, OrderRecord, OrderStatus, Product, ProductQuery, PromotionCode, ReferralAccount,
    ReferralCreditEntry, Result,
};

/// A stream of order rows, oldest first.
pub type OrderStream = Pin<Box<dyn Stream<Item = Result<OrderRecord>> + Send>>;

/// Core trait for shop store implementations.
///
/// The store is a thin table API: no transactions span multiple calls, and
/// callers own whatever consistency they need across calls. All
/// implementations must be thread-safe (Send + Sync).
///
/// `update_*` methods return [`StoreError::NotFound`](crate::StoreError)
/// when the target row does not exist.
#[async_trait]
pub trait ShopStore: Send + Sync {
    // -- Catalog --

    /// Retrieves products matching a query, ordered by creation time descending.
    async fn find_products(&self, query: ProductQuery) -> Result<Vec<Product>>;

    /// Retrieves a product by id.
    async fn get_product(&self, id: EntityId) -> Result<Option<Product>>;

    /// Inserts a new product row.
    async fn insert_product(&self, product: Product) -> Result<()>;

    /// Sets a product's on-hand quantity.
    async fn update_stock(&self, id: EntityId, stock_quantity: u32) -> Result<()>;

    /// Updates a product's stock tracking settings in one write.
    async fn update_stock_settings(
        &self,
        id: EntityId,
        track_stock: bool,
        stock_quantity: u32,
        low_stock_threshold: u32,
    ) -> Result<()>;

    // -- Promotions --

    /// Retrieves a promotion row by its stored (upper-cased) code.
    ///
    /// Callers are expected to upper-case user input before lookup; the
    /// store compares exactly against the stored value.
    async fn find_promotion(&self, code: &str) -> Result<Option<PromotionCode>>;

    /// Inserts a new promotion row.
    async fn insert_promotion(&self, promotion: PromotionCode) -> Result<()>;

    /// Activates or deactivates a promotion code.
    async fn set_promotion_active(&self, code: &str, is_active: bool) -> Result<()>;

    /// Overwrites a promotion's usage counter with `new_count`.
    ///
    /// This is a plain write, not an atomic increment. The checkout flow's
    /// read-then-write sequence around it can lose updates under concurrent
    /// use of the same code.
    async fn update_promotion_usage(&self, code: &str, new_count: u32) -> Result<()>;

    // -- Referral accounts --

    /// Retrieves an active referral account by its code, case-insensitively.
    ///
    /// Inactive accounts are not returned.
    async fn find_referral_account(&self, referral_code: &str)
    -> Result<Option<ReferralAccount>>;

    /// Retrieves a referral account by id, active or not.
    async fn get_referral_account(&self, id: EntityId) -> Result<Option<ReferralAccount>>;

    /// Inserts a new referral account row.
    async fn insert_referral_account(&self, account: ReferralAccount) -> Result<()>;

    /// Overwrites a referral account's credit balance.
    async fn update_referral_balance(&self, id: EntityId, new_balance: Money) -> Result<()>;

    // -- Orders --

    /// Inserts a new order row. No uniqueness check is performed on the
    /// order code before insert.
    async fn insert_order(&self, order: OrderRecord) -> Result<()>;

    /// Retrieves an order by its human-readable code.
    async fn get_order_by_code(&self, code: &str) -> Result<Option<OrderRecord>>;

    /// Updates an order's status.
    async fn update_order_status(&self, code: &str, status: OrderStatus) -> Result<()>;

    /// Streams all orders, oldest first.
    async fn stream_orders(&self) -> Result<OrderStream>;

    // -- Referral credits --

    /// Inserts a new referral credit entry.
    async fn insert_referral_credit(&self, entry: ReferralCreditEntry) -> Result<()>;

    /// Retrieves a credit entry by id.
    async fn get_referral_credit(&self, id: EntityId) -> Result<Option<ReferralCreditEntry>>;

    /// Lists credit entries, newest first, optionally for one account.
    async fn list_referral_credits(
        &self,
        account_id: Option<EntityId>,
    ) -> Result<Vec<ReferralCreditEntry>>;

    /// Updates a credit entry's status.
    async fn update_referral_credit_status(
        &self,
        id: EntityId,
        status: CreditStatus,
    ) -> Result<()>;
}

/// Extension trait providing convenience methods for shop stores.
#[async_trait]
pub trait ShopStoreExt: ShopStore {
    /// Checks if an order with the given code exists.
    async fn order_exists(&self, code: &str) -> Result<bool> {
        Ok(self.get_order_by_code(code).await?.is_some())
    }

    /// Collects the order stream into a vector, oldest first.
    async fn all_orders(&self) -> Result<Vec<OrderRecord>> {
        self.stream_orders().await?.try_collect().await
    }
}

// Blanket implementation for all ShopStore implementations
impl<T: ShopStore + ?Sized> ShopStoreExt for T {}
