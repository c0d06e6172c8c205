//! Checkout service.
//!
//! Drives the checkout sequence against the store:
//!
//! 1. Validate the cart and customer email.
//! 2. Price the cart with the applied promotion, if any.
//! 3. Persist the order.
//! 4. Bump the promotion's usage counter.
//! 5. Record a pending referral credit.
//!
//! Steps 4 and 5 run after the order is persisted and are best-effort:
//! their failures are returned as warnings on the receipt, never as
//! errors. There is no transaction across the steps; a crash between
//! them leaves the order in place with the side effects unrecorded.

use chrono::Utc;
use common::{EntityId, Money, OrderCode};
use domain::{Cart, PricedTotals};
use serde::{Deserialize, Serialize};
use store::{OrderLine, OrderRecord, OrderStatus, ReferralCreditEntry, ShopStore};

use crate::error::CheckoutError;
use crate::promotion::AppliedPromotion;
use crate::referral::ReferralResolver;

/// Input to a checkout: the cart plus customer-supplied codes.
///
/// The promotion is resolved before checkout so rejections surface to
/// the customer; the referral code stays raw because its failure is
/// silent.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub cart: Cart,
    pub customer_email: String,
    pub promotion: Option<AppliedPromotion>,
    pub referral_code: Option<String>,
}

/// Shown to the customer alongside the receipt. Delivery is handled
/// manually, so the order confirmation tells them how we follow up.
pub const FULFILLMENT_NOTE: &str =
    "Your order is confirmed. We will contact you by email with delivery details.";

/// A side effect that failed after the order was already persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SideEffectWarning {
    /// The promotion usage counter was not bumped.
    PromotionUsageNotRecorded { code: String },
    /// The referral code did not resolve or the credit insert failed.
    ReferralCreditSkipped { code: String },
}

/// What the customer gets back from a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order_id: EntityId,
    pub order_code: OrderCode,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub total: Money,
    pub warnings: Vec<SideEffectWarning>,
}

/// Orchestrates checkouts against a [`ShopStore`].
#[derive(Debug, Clone)]
pub struct CheckoutService<S> {
    store: S,
    referrals: ReferralResolver<S>,
}

impl<S: ShopStore + Clone> CheckoutService<S> {
    pub fn new(store: S) -> Self {
        let referrals = ReferralResolver::new(store.clone());
        Self { store, referrals }
    }

    /// Runs a checkout end to end.
    ///
    /// Fails only before the order insert (validation) or on the insert
    /// itself; everything after is reported through receipt warnings.
    #[tracing::instrument(skip(self, request), fields(customer_email = %request.customer_email))]
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutReceipt, CheckoutError> {
        metrics::counter!("checkout_total").increment(1);
        let checkout_start = std::time::Instant::now();

        // 1. Validation
        if request.cart.is_empty() {
            metrics::counter!("checkout_failed").increment(1);
            return Err(CheckoutError::EmptyCart);
        }
        let customer_email = request.customer_email.trim().to_string();
        if customer_email.is_empty() {
            metrics::counter!("checkout_failed").increment(1);
            return Err(CheckoutError::EmptyEmail);
        }

        // 2. Pricing
        let subtotal = request.cart.subtotal();
        let effect = request.promotion.as_ref().map(|applied| applied.effect);
        let totals = PricedTotals::price(subtotal, effect);

        // 3. Persist the order
        let order = OrderRecord {
            id: EntityId::new(),
            order_code: OrderCode::generate(),
            items: request
                .cart
                .lines()
                .iter()
                .map(|line| {
                    OrderLine::new(
                        line.product_id,
                        &line.product_name,
                        line.quantity,
                        line.unit_price,
                    )
                })
                .collect(),
            total_amount: totals.total,
            customer_email,
            discount_code: request.promotion.as_ref().map(|applied| applied.code.clone()),
            discount_amount: totals.discount,
            referral_code: request.referral_code.clone(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        let order_id = order.id;
        let order_code = order.order_code.clone();

        if let Err(e) = self.store.insert_order(order).await {
            metrics::counter!("checkout_failed").increment(1);
            return Err(CheckoutError::Persistence(e));
        }
        tracing::info!(%order_code, total = %totals.total, "order persisted");

        let mut warnings = Vec::new();

        // 4. Bump promotion usage
        if let Some(applied) = &request.promotion {
            if let Err(warning) = self.bump_promotion_usage(&applied.code).await {
                tracing::warn!(code = %applied.code, "promotion usage bump failed");
                warnings.push(warning);
            }
        }

        // 5. Record referral credit
        if let Some(referral_code) = request.referral_code.as_deref() {
            if let Err(warning) = self.record_referral_credit(referral_code, order_id).await {
                tracing::warn!(referral_code, "referral credit skipped");
                warnings.push(warning);
            }
        }

        let duration = checkout_start.elapsed().as_secs_f64();
        metrics::histogram!("checkout_duration_seconds").record(duration);
        metrics::counter!("checkout_completed").increment(1);
        tracing::info!(%order_code, duration, "checkout completed");

        Ok(CheckoutReceipt {
            order_id,
            order_code,
            subtotal: totals.subtotal,
            discount_amount: totals.discount,
            total: totals.total,
            warnings,
        })
    }

    /// Re-reads the promotion row and writes back usage_count + 1.
    ///
    /// This is a read-then-write with no guard; concurrent checkouts can
    /// lose an increment.
    async fn bump_promotion_usage(&self, code: &str) -> Result<(), SideEffectWarning> {
        let warning = || SideEffectWarning::PromotionUsageNotRecorded {
            code: code.to_string(),
        };

        let promotion = self
            .store
            .find_promotion(code)
            .await
            .map_err(|_| warning())?
            .ok_or_else(warning)?;

        self.store
            .update_promotion_usage(code, promotion.usage_count + 1)
            .await
            .map_err(|_| warning())
    }

    async fn record_referral_credit(
        &self,
        referral_code: &str,
        order_id: EntityId,
    ) -> Result<(), SideEffectWarning> {
        let warning = || SideEffectWarning::ReferralCreditSkipped {
            code: referral_code.to_string(),
        };

        let account = self
            .referrals
            .resolve(referral_code)
            .await
            .map_err(|_| warning())?;

        let entry = ReferralCreditEntry::pending(account.id, order_id, account.credit_per_order);
        self.store
            .insert_referral_credit(entry)
            .await
            .map_err(|_| warning())
    }
}
