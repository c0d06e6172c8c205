//! Storefront product listing and detail endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use store::{Category, EntityId, Product, ProductQuery, ShopStore};

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct ProductListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub price_cents: i64,
    pub original_price_cents: Option<i64>,
    pub show_fake_discount: bool,
    pub stock_quantity: u32,
    pub track_stock: bool,
    pub out_of_stock: bool,
    pub low_stock: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ProductResponse {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.to_string(),
            image_url: product.image_url.clone(),
            price_cents: product.price.cents(),
            original_price_cents: product.original_price.map(|p| p.cents()),
            show_fake_discount: product.show_fake_discount,
            stock_quantity: product.stock_quantity,
            track_stock: product.track_stock,
            out_of_stock: product.is_out_of_stock(),
            low_stock: product.is_low_stock(),
            created_at: product.created_at,
        }
    }
}

/// GET /products — list products, newest first, with optional filters.
#[tracing::instrument(skip(state, params))]
pub async fn list<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let mut query = ProductQuery::new();

    if let Some(ref raw) = params.category {
        let category = Category::parse(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown category: {raw}")))?;
        query = query.category(category);
    }
    if let Some(ref search) = params.search {
        query = query.search(search);
    }
    if let Some(limit) = params.limit {
        query = query.limit(limit);
    }
    if let Some(offset) = params.offset {
        query = query.offset(offset);
    }

    let products = state.store.find_products(query).await?;
    Ok(Json(products.iter().map(ProductResponse::from_product).collect()))
}

/// GET /products/:id — load a single product.
#[tracing::instrument(skip(state))]
pub async fn get<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id = parse_entity_id(&id)?;
    let product = state
        .store
        .get_product(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;

    Ok(Json(ProductResponse::from_product(&product)))
}

pub(crate) fn parse_entity_id(id: &str) -> Result<EntityId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid id: {e}")))?;
    Ok(EntityId::from_uuid(uuid))
}
