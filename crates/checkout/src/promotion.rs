//! Promotion code resolution.

use domain::PromotionEffect;
use serde::{Deserialize, Serialize};
use store::{ShopStore, StoreError};

/// A promotion code that passed validation, ready to price a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPromotion {
    /// The code as stored, upper-cased.
    pub code: String,
    pub effect: PromotionEffect,
}

/// Why a promotion code could not be applied.
#[derive(Debug, thiserror::Error)]
pub enum PromotionRejection {
    /// No active promotion under this code.
    #[error("promotion code not found")]
    NotFound,

    /// The code exists but its usage limit is reached.
    #[error("promotion code usage limit reached")]
    UsageExhausted,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates customer-supplied promotion codes against the store.
#[derive(Debug, Clone)]
pub struct PromotionResolver<S> {
    store: S,
}

impl<S: ShopStore> PromotionResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Resolves a raw code to an applicable promotion.
    ///
    /// Input is upper-cased before lookup, so codes are case-insensitive
    /// for customers. Inactive codes are indistinguishable from missing
    /// ones; only active codes with a reached usage limit report
    /// [`PromotionRejection::UsageExhausted`].
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, raw_code: &str) -> Result<AppliedPromotion, PromotionRejection> {
        let code = raw_code.trim().to_uppercase();

        let promotion = self
            .store
            .find_promotion(&code)
            .await?
            .filter(|promotion| promotion.is_active)
            .ok_or(PromotionRejection::NotFound)?;

        if promotion.is_exhausted() {
            return Err(PromotionRejection::UsageExhausted);
        }

        tracing::debug!(code = %promotion.code, "promotion code resolved");
        Ok(AppliedPromotion {
            effect: PromotionEffect::from_code(&promotion),
            code: promotion.code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{EntityId, Money};
    use store::{DiscountType, InMemoryShopStore, PromotionCode};

    fn promotion(code: &str, usage_count: u32, max_usage: Option<u32>, active: bool) -> PromotionCode {
        PromotionCode {
            id: EntityId::new(),
            code: code.to_string(),
            discount_type: DiscountType::Percentage,
            discount_percentage: 10,
            fixed_amount: Money::zero(),
            usage_count,
            max_usage,
            is_active: active,
            created_at: Utc::now(),
        }
    }

    async fn resolver_with(codes: Vec<PromotionCode>) -> PromotionResolver<InMemoryShopStore> {
        let store = InMemoryShopStore::new();
        for code in codes {
            store.insert_promotion(code).await.unwrap();
        }
        PromotionResolver::new(store)
    }

    #[tokio::test]
    async fn resolves_case_insensitively() {
        let resolver = resolver_with(vec![promotion("WELCOME10", 0, None, true)]).await;

        let applied = resolver.resolve("  welcome10 ").await.unwrap();
        assert_eq!(applied.code, "WELCOME10");
        assert_eq!(applied.effect, PromotionEffect::Percentage(10));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let resolver = resolver_with(vec![]).await;

        let result = resolver.resolve("NOSUCH").await;
        assert!(matches!(result, Err(PromotionRejection::NotFound)));
    }

    #[tokio::test]
    async fn inactive_code_is_not_found() {
        let resolver = resolver_with(vec![promotion("OLD", 0, None, false)]).await;

        let result = resolver.resolve("OLD").await;
        assert!(matches!(result, Err(PromotionRejection::NotFound)));
    }

    #[tokio::test]
    async fn exhausted_active_code_is_rejected() {
        let resolver = resolver_with(vec![promotion("LIMITED", 5, Some(5), true)]).await;

        let result = resolver.resolve("LIMITED").await;
        assert!(matches!(result, Err(PromotionRejection::UsageExhausted)));
    }

    #[tokio::test]
    async fn exhausted_inactive_code_is_not_found() {
        let resolver = resolver_with(vec![promotion("RETIRED", 5, Some(5), false)]).await;

        let result = resolver.resolve("RETIRED").await;
        assert!(matches!(result, Err(PromotionRejection::NotFound)));
    }

    #[tokio::test]
    async fn fixed_code_resolves_to_fixed_effect() {
        let mut code = promotion("FLAT300", 0, None, true);
        code.discount_type = DiscountType::Fixed;
        code.fixed_amount = Money::from_dinars(300);
        let resolver = resolver_with(vec![code]).await;

        let applied = resolver.resolve("flat300").await.unwrap();
        assert_eq!(applied.effect, PromotionEffect::Fixed(Money::from_dinars(300)));
    }
}
