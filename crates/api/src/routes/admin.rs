//! Back-office endpoints: stock, promotions, order status, referral payouts.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use common::{EntityId, Money};
use serde::{Deserialize, Serialize};
use store::{
    Category, CreditStatus, DiscountType, OrderStatus, Product, PromotionCode, ReferralAccount,
    ReferralCreditEntry, ShopStore, ShopStoreExt,
};

use crate::error::ApiError;
use crate::routes::AppState;
use crate::routes::orders::OrderResponse;
use crate::routes::products::parse_entity_id;

// -- Products --

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub price_cents: i64,
    pub original_price_cents: Option<i64>,
    #[serde(default)]
    pub show_fake_discount: bool,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub track_stock: bool,
    #[serde(default)]
    pub low_stock_threshold: u32,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// POST /admin/products — add a product to the catalog.
#[tracing::instrument(skip(state, req))]
pub async fn create_product<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let category = Category::parse(&req.category)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown category: {}", req.category)))?;
    if req.price_cents < 0 {
        return Err(ApiError::BadRequest("Price must not be negative".to_string()));
    }

    let product = Product {
        id: EntityId::new(),
        name: req.name,
        description: req.description,
        category,
        image_url: req.image_url,
        price: Money::from_cents(req.price_cents),
        original_price: req.original_price_cents.map(Money::from_cents),
        show_fake_discount: req.show_fake_discount,
        stock_quantity: req.stock_quantity,
        track_stock: req.track_stock,
        low_stock_threshold: req.low_stock_threshold,
        created_at: Utc::now(),
    };
    let id = product.id;
    state.store.insert_product(product).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.to_string() })))
}

#[derive(Deserialize)]
pub struct UpdateStockRequest {
    pub stock_quantity: u32,
    pub track_stock: Option<bool>,
    pub low_stock_threshold: Option<u32>,
}

/// PUT /admin/products/:id/stock — set stock, optionally tracking settings.
#[tracing::instrument(skip(state, req))]
pub async fn update_stock<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStockRequest>,
) -> Result<StatusCode, ApiError> {
    let product_id = parse_entity_id(&id)?;

    if req.track_stock.is_some() || req.low_stock_threshold.is_some() {
        let product = state
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;
        state
            .store
            .update_stock_settings(
                product_id,
                req.track_stock.unwrap_or(product.track_stock),
                req.stock_quantity,
                req.low_stock_threshold.unwrap_or(product.low_stock_threshold),
            )
            .await?;
    } else {
        state.store.update_stock(product_id, req.stock_quantity).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}

// -- Promotions --

#[derive(Deserialize)]
pub struct CreatePromotionRequest {
    pub code: String,
    pub discount_type: String,
    #[serde(default)]
    pub discount_percentage: u32,
    #[serde(default)]
    pub fixed_amount_cents: i64,
    pub max_usage: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
pub struct CreatedPromotionResponse {
    pub id: String,
    pub code: String,
}

/// POST /admin/promotions — create a promotion code.
///
/// Codes are stored upper-cased so customer input can be case-folded at
/// lookup time.
#[tracing::instrument(skip(state, req))]
pub async fn create_promotion<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreatePromotionRequest>,
) -> Result<(StatusCode, Json<CreatedPromotionResponse>), ApiError> {
    let code = req.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(ApiError::BadRequest("Code must not be empty".to_string()));
    }

    let discount_type = match req.discount_type.as_str() {
        "percentage" => DiscountType::Percentage,
        "fixed" => DiscountType::Fixed,
        other => {
            return Err(ApiError::BadRequest(format!("Unknown discount type: {other}")));
        }
    };

    let promotion = PromotionCode {
        id: EntityId::new(),
        code: code.clone(),
        discount_type,
        discount_percentage: req.discount_percentage,
        fixed_amount: Money::from_cents(req.fixed_amount_cents),
        usage_count: 0,
        max_usage: req.max_usage,
        is_active: req.is_active,
        created_at: Utc::now(),
    };
    let id = promotion.id;
    state.store.insert_promotion(promotion).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedPromotionResponse {
            id: id.to_string(),
            code,
        }),
    ))
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// PUT /admin/promotions/:code/active — enable or disable a code.
#[tracing::instrument(skip(state, req))]
pub async fn set_promotion_active<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(code): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .set_promotion_active(&code.trim().to_uppercase(), req.is_active)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Orders --

/// GET /admin/orders — all orders, newest first.
#[tracing::instrument(skip(state))]
pub async fn list_orders<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let mut orders = state.store.all_orders().await?;
    orders.reverse();
    Ok(Json(orders.iter().map(OrderResponse::from_order).collect()))
}

#[derive(Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// PUT /admin/orders/:code/status — move an order through its lifecycle.
#[tracing::instrument(skip(state, req))]
pub async fn update_order_status<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(code): Path<String>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<StatusCode, ApiError> {
    let status = OrderStatus::parse(&req.status)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown order status: {}", req.status)))?;
    state.store.update_order_status(&code, status).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Referral accounts and credits --

#[derive(Deserialize)]
pub struct CreateReferralAccountRequest {
    pub username: String,
    pub referral_code: String,
    pub credit_per_order_cents: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// POST /admin/referral-accounts — register an affiliate partner.
#[tracing::instrument(skip(state, req))]
pub async fn create_referral_account<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateReferralAccountRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let referral_code = req.referral_code.trim().to_string();
    if referral_code.is_empty() {
        return Err(ApiError::BadRequest("Referral code must not be empty".to_string()));
    }

    let account = ReferralAccount {
        id: EntityId::new(),
        username: req.username,
        referral_code,
        credit_balance: Money::zero(),
        credit_per_order: Money::from_cents(req.credit_per_order_cents),
        is_active: req.is_active,
        created_at: Utc::now(),
    };
    let id = account.id;
    state.store.insert_referral_account(account).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.to_string() })))
}

#[derive(Deserialize)]
pub struct CreditListParams {
    pub account_id: Option<String>,
}

#[derive(Serialize)]
pub struct CreditResponse {
    pub id: String,
    pub referral_account_id: String,
    pub order_id: String,
    pub credit_earned_cents: i64,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl CreditResponse {
    fn from_entry(entry: &ReferralCreditEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            referral_account_id: entry.referral_account_id.to_string(),
            order_id: entry.order_id.to_string(),
            credit_earned_cents: entry.credit_earned.cents(),
            status: entry.status.to_string(),
            created_at: entry.created_at,
        }
    }
}

/// GET /admin/referral-credits — list credit entries, optionally per partner.
#[tracing::instrument(skip(state, params))]
pub async fn list_referral_credits<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<CreditListParams>,
) -> Result<Json<Vec<CreditResponse>>, ApiError> {
    let account_id = params
        .account_id
        .as_deref()
        .map(parse_entity_id)
        .transpose()?;

    let credits = state.store.list_referral_credits(account_id).await?;
    Ok(Json(credits.iter().map(CreditResponse::from_entry).collect()))
}

/// POST /admin/referral-credits/:id/approve — approve a pending credit and
/// pay it into the partner's balance.
///
/// The status write and the balance bump are separate store calls, same as
/// the original back office. A failure in between leaves an approved credit
/// whose amount never reached the balance.
#[tracing::instrument(skip(state))]
pub async fn approve_referral_credit<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CreditResponse>, ApiError> {
    let entry = load_pending_credit(&state, &id).await?;

    state
        .store
        .update_referral_credit_status(entry.id, CreditStatus::Approved)
        .await?;

    let account = state
        .store
        .get_referral_account(entry.referral_account_id)
        .await?
        .ok_or_else(|| {
            ApiError::Internal(format!(
                "Referral account {} missing for credit {id}",
                entry.referral_account_id
            ))
        })?;
    state
        .store
        .update_referral_balance(account.id, account.credit_balance + entry.credit_earned)
        .await?;

    metrics::counter!("referral_credits_approved").increment(1);
    let updated = ReferralCreditEntry {
        status: CreditStatus::Approved,
        ..entry
    };
    Ok(Json(CreditResponse::from_entry(&updated)))
}

/// POST /admin/referral-credits/:id/reject — reject a pending credit.
#[tracing::instrument(skip(state))]
pub async fn reject_referral_credit<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CreditResponse>, ApiError> {
    let entry = load_pending_credit(&state, &id).await?;

    state
        .store
        .update_referral_credit_status(entry.id, CreditStatus::Rejected)
        .await?;

    let updated = ReferralCreditEntry {
        status: CreditStatus::Rejected,
        ..entry
    };
    Ok(Json(CreditResponse::from_entry(&updated)))
}

async fn load_pending_credit<S: ShopStore>(
    state: &AppState<S>,
    id: &str,
) -> Result<ReferralCreditEntry, ApiError> {
    let entry_id = parse_entity_id(id)?;
    let entry = state
        .store
        .get_referral_credit(entry_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Referral credit {id} not found")))?;

    if !entry.status.is_pending() {
        return Err(ApiError::Conflict(format!(
            "Referral credit {id} is already {}",
            entry.status
        )));
    }
    Ok(entry)
}
