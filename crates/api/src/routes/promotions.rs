//! Promotion code validation endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::Money;
use domain::{PromotionEffect, discount_amount};
use serde::{Deserialize, Serialize};
use store::ShopStore;

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct ValidatePromotionRequest {
    pub code: String,
    /// When present, the response includes the discount this code would
    /// yield against the subtotal.
    pub subtotal_cents: Option<i64>,
}

#[derive(Serialize)]
pub struct ValidatePromotionResponse {
    pub code: String,
    pub effect: PromotionEffect,
    pub discount_cents: Option<i64>,
}

/// POST /promotions/validate — check a code and preview its discount.
#[tracing::instrument(skip(state, req))]
pub async fn validate<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<ValidatePromotionRequest>,
) -> Result<Json<ValidatePromotionResponse>, ApiError> {
    let applied = state.promotion_resolver.resolve(&req.code).await?;

    let discount_cents = req
        .subtotal_cents
        .map(|subtotal| discount_amount(Money::from_cents(subtotal), applied.effect).cents());

    Ok(Json(ValidatePromotionResponse {
        code: applied.code,
        effect: applied.effect,
        discount_cents,
    }))
}
