use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use common::{EntityId, Money};

use crate::{
    Category, CreditStatus, DiscountType, OrderRecord, OrderStatus, Product, ProductQuery,
    PromotionCode, ReferralAccount, ReferralCreditEntry, Result, StoreError,
    store::{OrderStream, ShopStore},
};

/// PostgreSQL-backed shop store implementation.
#[derive(Clone)]
pub struct PostgresShopStore {
    pool: PgPool,
}

impl PostgresShopStore {
    /// Creates a new PostgreSQL shop store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database and wraps the pool in a store.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn decode_err(msg: String) -> StoreError {
        StoreError::Database(sqlx::Error::Decode(msg.into()))
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        let category_str: String = row.try_get("category")?;
        let category = Category::parse(&category_str)
            .ok_or_else(|| Self::decode_err(format!("unknown category: {category_str}")))?;

        Ok(Product {
            id: EntityId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            category,
            image_url: row.try_get("image_url")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            original_price: row
                .try_get::<Option<i64>, _>("original_price_cents")?
                .map(Money::from_cents),
            show_fake_discount: row.try_get("show_fake_discount")?,
            stock_quantity: row.try_get::<i32, _>("stock_quantity")? as u32,
            track_stock: row.try_get("track_stock")?,
            low_stock_threshold: row.try_get::<i32, _>("low_stock_threshold")? as u32,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_promotion(row: PgRow) -> Result<PromotionCode> {
        let type_str: String = row.try_get("discount_type")?;
        let discount_type = DiscountType::parse(&type_str)
            .ok_or_else(|| Self::decode_err(format!("unknown discount type: {type_str}")))?;

        Ok(PromotionCode {
            id: EntityId::from_uuid(row.try_get::<Uuid, _>("id")?),
            code: row.try_get("code")?,
            discount_type,
            discount_percentage: row.try_get::<i32, _>("discount_percentage")? as u32,
            fixed_amount: Money::from_cents(row.try_get("fixed_amount_cents")?),
            usage_count: row.try_get::<i32, _>("usage_count")? as u32,
            max_usage: row.try_get::<Option<i32>, _>("max_usage")?.map(|m| m as u32),
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_account(row: PgRow) -> Result<ReferralAccount> {
        Ok(ReferralAccount {
            id: EntityId::from_uuid(row.try_get::<Uuid, _>("id")?),
            username: row.try_get("username")?,
            referral_code: row.try_get("referral_code")?,
            credit_balance: Money::from_cents(row.try_get("credit_balance_cents")?),
            credit_per_order: Money::from_cents(row.try_get("credit_per_order_cents")?),
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_order(row: PgRow) -> Result<OrderRecord> {
        let items_json: serde_json::Value = row.try_get("items")?;
        let items = serde_json::from_value(items_json)?;

        let code_str: String = row.try_get("order_code")?;
        let order_code = code_str
            .parse()
            .map_err(|e| Self::decode_err(format!("{e}")))?;

        let status_str: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status_str)
            .ok_or_else(|| Self::decode_err(format!("unknown order status: {status_str}")))?;

        Ok(OrderRecord {
            id: EntityId::from_uuid(row.try_get::<Uuid, _>("id")?),
            order_code,
            items,
            total_amount: Money::from_cents(row.try_get("total_amount_cents")?),
            customer_email: row.try_get("customer_email")?,
            discount_code: row.try_get("discount_code")?,
            discount_amount: Money::from_cents(row.try_get("discount_amount_cents")?),
            referral_code: row.try_get("referral_code")?,
            status,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_credit(row: PgRow) -> Result<ReferralCreditEntry> {
        let status_str: String = row.try_get("status")?;
        let status = CreditStatus::parse(&status_str)
            .ok_or_else(|| Self::decode_err(format!("unknown credit status: {status_str}")))?;

        Ok(ReferralCreditEntry {
            id: EntityId::from_uuid(row.try_get::<Uuid, _>("id")?),
            referral_account_id: EntityId::from_uuid(
                row.try_get::<Uuid, _>("referral_account_id")?,
            ),
            order_id: EntityId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            credit_earned: Money::from_cents(row.try_get("credit_earned_cents")?),
            status,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ShopStore for PostgresShopStore {
    async fn find_products(&self, query: ProductQuery) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM products
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL
                   OR name ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.category.map(|c| c.as_str()))
        .bind(query.search.as_deref())
        .bind(query.limit.map(|l| l as i64))
        .bind(query.offset.unwrap_or(0) as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn get_product(&self, id: EntityId) -> Result<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn insert_product(&self, product: Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, category, image_url, price_cents,
                 original_price_cents, show_fake_discount, stock_quantity,
                 track_stock, low_stock_threshold, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category.as_str())
        .bind(&product.image_url)
        .bind(product.price.cents())
        .bind(product.original_price.map(|p| p.cents()))
        .bind(product.show_fake_discount)
        .bind(product.stock_quantity as i32)
        .bind(product.track_stock)
        .bind(product.low_stock_threshold as i32)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_stock(&self, id: EntityId, stock_quantity: u32) -> Result<()> {
        let result = sqlx::query("UPDATE products SET stock_quantity = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(stock_quantity as i32)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("product", id));
        }
        Ok(())
    }

    async fn update_stock_settings(
        &self,
        id: EntityId,
        track_stock: bool,
        stock_quantity: u32,
        low_stock_threshold: u32,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET track_stock = $2, stock_quantity = $3, low_stock_threshold = $4
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(track_stock)
        .bind(stock_quantity as i32)
        .bind(low_stock_threshold as i32)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("product", id));
        }
        Ok(())
    }

    async fn find_promotion(&self, code: &str) -> Result<Option<PromotionCode>> {
        let row = sqlx::query("SELECT * FROM promotion_codes WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_promotion).transpose()
    }

    async fn insert_promotion(&self, promotion: PromotionCode) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO promotion_codes
                (id, code, discount_type, discount_percentage, fixed_amount_cents,
                 usage_count, max_usage, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(promotion.id.as_uuid())
        .bind(&promotion.code)
        .bind(promotion.discount_type.as_str())
        .bind(promotion.discount_percentage as i32)
        .bind(promotion.fixed_amount.cents())
        .bind(promotion.usage_count as i32)
        .bind(promotion.max_usage.map(|m| m as i32))
        .bind(promotion.is_active)
        .bind(promotion.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_promotion_active(&self, code: &str, is_active: bool) -> Result<()> {
        let result = sqlx::query("UPDATE promotion_codes SET is_active = $2 WHERE code = $1")
            .bind(code)
            .bind(is_active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "promotion",
                id: code.to_string(),
            });
        }
        Ok(())
    }

    async fn update_promotion_usage(&self, code: &str, new_count: u32) -> Result<()> {
        let result = sqlx::query("UPDATE promotion_codes SET usage_count = $2 WHERE code = $1")
            .bind(code)
            .bind(new_count as i32)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "promotion",
                id: code.to_string(),
            });
        }
        Ok(())
    }

    async fn find_referral_account(
        &self,
        referral_code: &str,
    ) -> Result<Option<ReferralAccount>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM referral_accounts
            WHERE LOWER(referral_code) = LOWER($1) AND is_active = TRUE
            "#,
        )
        .bind(referral_code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_account).transpose()
    }

    async fn get_referral_account(&self, id: EntityId) -> Result<Option<ReferralAccount>> {
        let row = sqlx::query("SELECT * FROM referral_accounts WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_account).transpose()
    }

    async fn insert_referral_account(&self, account: ReferralAccount) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO referral_accounts
                (id, username, referral_code, credit_balance_cents,
                 credit_per_order_cents, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.username)
        .bind(&account.referral_code)
        .bind(account.credit_balance.cents())
        .bind(account.credit_per_order.cents())
        .bind(account.is_active)
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_referral_balance(&self, id: EntityId, new_balance: Money) -> Result<()> {
        let result =
            sqlx::query("UPDATE referral_accounts SET credit_balance_cents = $2 WHERE id = $1")
                .bind(id.as_uuid())
                .bind(new_balance.cents())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("referral_account", id));
        }
        Ok(())
    }

    async fn insert_order(&self, order: OrderRecord) -> Result<()> {
        let items_json = serde_json::to_value(&order.items)?;

        sqlx::query(
            r#"
            INSERT INTO orders
                (id, order_code, items, total_amount_cents, customer_email,
                 discount_code, discount_amount_cents, referral_code, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.order_code.as_str())
        .bind(items_json)
        .bind(order.total_amount.cents())
        .bind(&order.customer_email)
        .bind(order.discount_code.as_deref())
        .bind(order.discount_amount.cents())
        .bind(order.referral_code.as_deref())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_order_by_code(&self, code: &str) -> Result<Option<OrderRecord>> {
        // Duplicate codes are possible; take the earliest like the original UI did.
        let row = sqlx::query(
            "SELECT * FROM orders WHERE order_code = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn update_order_status(&self, code: &str, status: OrderStatus) -> Result<()> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE order_code = $1")
            .bind(code)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "order",
                id: code.to_string(),
            });
        }
        Ok(())
    }

    async fn stream_orders(&self) -> Result<OrderStream> {
        use futures_util::stream;

        // Materialized rather than cursor-streamed; order volume here is
        // admin-listing scale.
        let rows = sqlx::query("SELECT * FROM orders ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;

        let orders: Vec<Result<OrderRecord>> =
            rows.into_iter().map(Self::row_to_order).collect();
        Ok(Box::pin(stream::iter(orders)))
    }

    async fn insert_referral_credit(&self, entry: ReferralCreditEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO referral_credits
                (id, referral_account_id, order_id, credit_earned_cents, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.referral_account_id.as_uuid())
        .bind(entry.order_id.as_uuid())
        .bind(entry.credit_earned.cents())
        .bind(entry.status.as_str())
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_referral_credit(&self, id: EntityId) -> Result<Option<ReferralCreditEntry>> {
        let row = sqlx::query("SELECT * FROM referral_credits WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_credit).transpose()
    }

    async fn list_referral_credits(
        &self,
        account_id: Option<EntityId>,
    ) -> Result<Vec<ReferralCreditEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM referral_credits
            WHERE ($1::uuid IS NULL OR referral_account_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(account_id.map(|id| id.as_uuid()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_credit).collect()
    }

    async fn update_referral_credit_status(
        &self,
        id: EntityId,
        status: CreditStatus,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE referral_credits SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("referral_credit", id));
        }
        Ok(())
    }
}
