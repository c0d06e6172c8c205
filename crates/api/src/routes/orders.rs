//! Customer order lookup endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use store::{OrderRecord, ShopStore};

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Serialize)]
pub struct OrderResponse {
    pub order_code: String,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
    pub customer_email: String,
    pub discount_code: Option<String>,
    pub discount_cents: i64,
    pub referral_code: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl OrderResponse {
    pub fn from_order(order: &OrderRecord) -> Self {
        Self {
            order_code: order.order_code.to_string(),
            status: order.status.to_string(),
            items: order
                .items
                .iter()
                .map(|line| OrderItemResponse {
                    product_id: line.product_id.to_string(),
                    product_name: line.product_name.clone(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price.cents(),
                })
                .collect(),
            total_cents: order.total_amount.cents(),
            customer_email: order.customer_email.clone(),
            discount_code: order.discount_code.clone(),
            discount_cents: order.discount_amount.cents(),
            referral_code: order.referral_code.clone(),
            created_at: order.created_at,
        }
    }
}

/// GET /orders/:code — look up an order by its customer-facing code.
#[tracing::instrument(skip(state))]
pub async fn get<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(code): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .store
        .get_order_by_code(&code)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {code} not found")))?;

    Ok(Json(OrderResponse::from_order(&order)))
}
