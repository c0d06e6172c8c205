//! Checkout endpoint.
//!
//! The cart is rebuilt server-side from live product rows so the stock
//! invariant cannot be bypassed by a hand-crafted request body.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::{Cart, CartNotice};
use serde::{Deserialize, Serialize};
use store::ShopStore;

use crate::error::ApiError;
use crate::routes::AppState;
use crate::routes::products::parse_entity_id;

use ::checkout::{CheckoutRequest, FULFILLMENT_NOTE, SideEffectWarning};

#[derive(Deserialize)]
pub struct CheckoutRequestBody {
    pub items: Vec<CheckoutItemRequest>,
    pub customer_email: String,
    pub promotion_code: Option<String>,
    pub referral_code: Option<String>,
}

#[derive(Deserialize)]
pub struct CheckoutItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub order_code: String,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub warnings: Vec<SideEffectWarning>,
    pub fulfillment_note: &'static str,
}

/// POST /checkout — price the cart, persist the order, run side effects.
#[tracing::instrument(skip(state, req), fields(items = req.items.len()))]
pub async fn create<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CheckoutRequestBody>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let cart = build_cart(&state, &req.items).await?;

    let promotion = match req.promotion_code.as_deref() {
        Some(code) => Some(state.promotion_resolver.resolve(code).await?),
        None => None,
    };

    let receipt = state
        .checkout_service
        .checkout(CheckoutRequest {
            cart,
            customer_email: req.customer_email,
            promotion,
            referral_code: req.referral_code,
        })
        .await?;

    let response = CheckoutResponse {
        order_id: receipt.order_id.to_string(),
        order_code: receipt.order_code.to_string(),
        subtotal_cents: receipt.subtotal.cents(),
        discount_cents: receipt.discount_amount.cents(),
        total_cents: receipt.total.cents(),
        warnings: receipt.warnings,
        fulfillment_note: FULFILLMENT_NOTE,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Rebuilds the cart against live product rows, enforcing stock caps.
async fn build_cart<S: ShopStore>(
    state: &AppState<S>,
    items: &[CheckoutItemRequest],
) -> Result<Cart, ApiError> {
    let mut cart = Cart::new();

    for item in items {
        if item.quantity == 0 {
            return Err(ApiError::BadRequest(format!(
                "Quantity for product {} must be at least 1",
                item.product_id
            )));
        }

        let product_id = parse_entity_id(&item.product_id)?;
        let product = state
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Product {} not found", item.product_id)))?;

        if cart.add(&product) == CartNotice::OutOfStock {
            return Err(ApiError::BadRequest(format!(
                "{} is out of stock",
                product.name
            )));
        }

        if let Some(CartNotice::StockLimit { available }) =
            cart.set_quantity(product_id, item.quantity)
        {
            return Err(ApiError::BadRequest(format!(
                "Only {available} of {} left in stock",
                product.name
            )));
        }
    }

    Ok(cart)
}
