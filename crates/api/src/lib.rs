//! HTTP API server with observability for the gmshop storefront.
//!
//! Provides storefront endpoints (catalog, promotion validation, checkout,
//! order lookup) and back-office endpoints, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use checkout::{CheckoutService, PromotionResolver};
use metrics_exporter_prometheus::PrometheusHandle;
use store::ShopStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: ShopStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", get(routes::products::list::<S>))
        .route("/products/{id}", get(routes::products::get::<S>))
        .route("/promotions/validate", post(routes::promotions::validate::<S>))
        .route("/checkout", post(routes::checkout::create::<S>))
        .route("/orders/{code}", get(routes::orders::get::<S>))
        .route("/admin/products", post(routes::admin::create_product::<S>))
        .route(
            "/admin/products/{id}/stock",
            put(routes::admin::update_stock::<S>),
        )
        .route("/admin/promotions", post(routes::admin::create_promotion::<S>))
        .route(
            "/admin/promotions/{code}/active",
            put(routes::admin::set_promotion_active::<S>),
        )
        .route("/admin/orders", get(routes::admin::list_orders::<S>))
        .route(
            "/admin/orders/{code}/status",
            put(routes::admin::update_order_status::<S>),
        )
        .route(
            "/admin/referral-accounts",
            post(routes::admin::create_referral_account::<S>),
        )
        .route(
            "/admin/referral-credits",
            get(routes::admin::list_referral_credits::<S>),
        )
        .route(
            "/admin/referral-credits/{id}/approve",
            post(routes::admin::approve_referral_credit::<S>),
        )
        .route(
            "/admin/referral-credits/{id}/reject",
            post(routes::admin::reject_referral_credit::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state around a store.
pub fn create_default_state<S: ShopStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        checkout_service: CheckoutService::new(store.clone()),
        promotion_resolver: PromotionResolver::new(store.clone()),
        store,
    })
}
