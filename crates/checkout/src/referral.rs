//! Referral code resolution.

use store::{ReferralAccount, ShopStore, StoreError};

/// Why a referral code could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ReferralRejection {
    /// No active referral account under this code.
    #[error("referral code not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates referral codes against the store.
///
/// Lookup is case-insensitive and only active accounts resolve. During
/// checkout a failed resolution never aborts the order; the referral
/// credit is simply skipped.
#[derive(Debug, Clone)]
pub struct ReferralResolver<S> {
    store: S,
}

impl<S: ShopStore> ReferralResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, raw_code: &str) -> Result<ReferralAccount, ReferralRejection> {
        let code = raw_code.trim();

        let account = self
            .store
            .find_referral_account(code)
            .await?
            .ok_or(ReferralRejection::NotFound)?;

        tracing::debug!(referral_code = %account.referral_code, "referral code resolved");
        Ok(account)
    }
}
