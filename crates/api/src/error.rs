//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::{CheckoutError, PromotionRejection, ReferralRejection};
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Request conflicts with current resource state.
    Conflict(String),
    /// Checkout failure.
    Checkout(CheckoutError),
    /// Storage failure.
    Store(StoreError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Store(err) => store_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match &err {
        CheckoutError::EmptyCart | CheckoutError::EmptyEmail => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        CheckoutError::Persistence(_) => {
            tracing::error!(error = %err, "checkout persistence failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn store_error_to_response(err: StoreError) -> (StatusCode, String) {
    match &err {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        _ => {
            tracing::error!(error = %err, "storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<PromotionRejection> for ApiError {
    fn from(err: PromotionRejection) -> Self {
        match err {
            PromotionRejection::NotFound => ApiError::NotFound(err.to_string()),
            PromotionRejection::UsageExhausted => ApiError::BadRequest(err.to_string()),
            PromotionRejection::Store(store_err) => ApiError::Store(store_err),
        }
    }
}

impl From<ReferralRejection> for ApiError {
    fn from(err: ReferralRejection) -> Self {
        match err {
            ReferralRejection::NotFound => ApiError::NotFound(err.to_string()),
            ReferralRejection::Store(store_err) => ApiError::Store(store_err),
        }
    }
}
