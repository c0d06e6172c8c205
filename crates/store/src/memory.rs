use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{EntityId, Money};

use crate::{
    CreditStatus, OrderRecord, OrderStatus, Product, ProductQuery, PromotionCode, ReferralAccount,
    ReferralCreditEntry, Result, StoreError,
    store::{OrderStream, ShopStore},
};

/// In-memory shop store implementation.
///
/// Backs the test suites and the default server. Provides the same
/// interface and visible behavior as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryShopStore {
    products: Arc<RwLock<HashMap<EntityId, Product>>>,
    promotions: Arc<RwLock<HashMap<String, PromotionCode>>>,
    referral_accounts: Arc<RwLock<HashMap<EntityId, ReferralAccount>>>,
    orders: Arc<RwLock<Vec<OrderRecord>>>,
    credits: Arc<RwLock<Vec<ReferralCreditEntry>>>,
}

impl InMemoryShopStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Returns a promotion's current usage counter, for tests probing the
    /// read-then-write usage tracking.
    pub async fn promotion_usage(&self, code: &str) -> Option<u32> {
        self.promotions.read().await.get(code).map(|p| p.usage_count)
    }

    /// Clears all tables.
    pub async fn clear(&self) {
        self.products.write().await.clear();
        self.promotions.write().await.clear();
        self.referral_accounts.write().await.clear();
        self.orders.write().await.clear();
        self.credits.write().await.clear();
    }
}

#[async_trait]
impl ShopStore for InMemoryShopStore {
    async fn find_products(&self, query: ProductQuery) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| {
                if let Some(category) = query.category
                    && p.category != category
                {
                    return false;
                }
                query.matches_search(&p.name, &p.description)
            })
            .cloned()
            .collect();

        // Newest first, matching the catalog ordering
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = query.offset.unwrap_or(0);
        let matching: Vec<Product> = matching.into_iter().skip(offset).collect();

        let matching = if let Some(limit) = query.limit {
            matching.into_iter().take(limit).collect()
        } else {
            matching
        };

        Ok(matching)
    }

    async fn get_product(&self, id: EntityId) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn insert_product(&self, product: Product) -> Result<()> {
        self.products.write().await.insert(product.id, product);
        Ok(())
    }

    async fn update_stock(&self, id: EntityId, stock_quantity: u32) -> Result<()> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("product", id))?;
        product.stock_quantity = stock_quantity;
        Ok(())
    }

    async fn update_stock_settings(
        &self,
        id: EntityId,
        track_stock: bool,
        stock_quantity: u32,
        low_stock_threshold: u32,
    ) -> Result<()> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("product", id))?;
        product.track_stock = track_stock;
        product.stock_quantity = stock_quantity;
        product.low_stock_threshold = low_stock_threshold;
        Ok(())
    }

    async fn find_promotion(&self, code: &str) -> Result<Option<PromotionCode>> {
        Ok(self.promotions.read().await.get(code).cloned())
    }

    async fn insert_promotion(&self, promotion: PromotionCode) -> Result<()> {
        self.promotions
            .write()
            .await
            .insert(promotion.code.clone(), promotion);
        Ok(())
    }

    async fn set_promotion_active(&self, code: &str, is_active: bool) -> Result<()> {
        let mut promotions = self.promotions.write().await;
        let promotion = promotions.get_mut(code).ok_or(StoreError::NotFound {
            entity: "promotion",
            id: code.to_string(),
        })?;
        promotion.is_active = is_active;
        Ok(())
    }

    async fn update_promotion_usage(&self, code: &str, new_count: u32) -> Result<()> {
        let mut promotions = self.promotions.write().await;
        let promotion = promotions.get_mut(code).ok_or(StoreError::NotFound {
            entity: "promotion",
            id: code.to_string(),
        })?;
        promotion.usage_count = new_count;
        Ok(())
    }

    async fn find_referral_account(
        &self,
        referral_code: &str,
    ) -> Result<Option<ReferralAccount>> {
        let accounts = self.referral_accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.is_active && a.referral_code.eq_ignore_ascii_case(referral_code))
            .cloned())
    }

    async fn get_referral_account(&self, id: EntityId) -> Result<Option<ReferralAccount>> {
        Ok(self.referral_accounts.read().await.get(&id).cloned())
    }

    async fn insert_referral_account(&self, account: ReferralAccount) -> Result<()> {
        self.referral_accounts
            .write()
            .await
            .insert(account.id, account);
        Ok(())
    }

    async fn update_referral_balance(&self, id: EntityId, new_balance: Money) -> Result<()> {
        let mut accounts = self.referral_accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("referral_account", id))?;
        account.credit_balance = new_balance;
        Ok(())
    }

    async fn insert_order(&self, order: OrderRecord) -> Result<()> {
        self.orders.write().await.push(order);
        Ok(())
    }

    async fn get_order_by_code(&self, code: &str) -> Result<Option<OrderRecord>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.order_code.as_str() == code).cloned())
    }

    async fn update_order_status(&self, code: &str, status: OrderStatus) -> Result<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.order_code.as_str() == code)
            .ok_or(StoreError::NotFound {
                entity: "order",
                id: code.to_string(),
            })?;
        order.status = status;
        Ok(())
    }

    async fn stream_orders(&self) -> Result<OrderStream> {
        use futures_util::stream;

        let orders = self.orders.read().await;
        let mut all = orders.clone();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let stream = stream::iter(all.into_iter().map(Ok));
        Ok(Box::pin(stream))
    }

    async fn insert_referral_credit(&self, entry: ReferralCreditEntry) -> Result<()> {
        self.credits.write().await.push(entry);
        Ok(())
    }

    async fn get_referral_credit(&self, id: EntityId) -> Result<Option<ReferralCreditEntry>> {
        let credits = self.credits.read().await;
        Ok(credits.iter().find(|c| c.id == id).cloned())
    }

    async fn list_referral_credits(
        &self,
        account_id: Option<EntityId>,
    ) -> Result<Vec<ReferralCreditEntry>> {
        let credits = self.credits.read().await;
        let mut matching: Vec<ReferralCreditEntry> = credits
            .iter()
            .filter(|c| account_id.is_none_or(|id| c.referral_account_id == id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update_referral_credit_status(
        &self,
        id: EntityId,
        status: CreditStatus,
    ) -> Result<()> {
        let mut credits = self.credits.write().await;
        let entry = credits
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("referral_credit", id))?;
        entry.status = status;
        Ok(())
    }
}
