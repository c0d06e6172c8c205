//! Referral affiliate rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{EntityId, Money};

/// An affiliate account that earns credit for referred orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralAccount {
    pub id: EntityId,
    pub username: String,

    /// Unique lookup key attached to orders. Matched case-insensitively.
    pub referral_code: String,

    /// Accumulated approved credit. Mutated only by admin approval of a
    /// credit entry, never by checkout.
    pub credit_balance: Money,

    /// Fixed award per qualifying order.
    pub credit_per_order: Money,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a referral credit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CreditStatus {
    /// Created at checkout, awaiting admin review.
    #[default]
    Pending,
    /// Approved by an admin; the account balance has been credited.
    Approved,
    /// Rejected by an admin; no credit awarded.
    Rejected,
}

impl CreditStatus {
    /// Returns the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditStatus::Pending => "pending",
            CreditStatus::Approved => "approved",
            CreditStatus::Rejected => "rejected",
        }
    }

    /// Parses a stored status name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CreditStatus::Pending),
            "approved" => Some(CreditStatus::Approved),
            "rejected" => Some(CreditStatus::Rejected),
            _ => None,
        }
    }

    /// Returns true if the entry can still be reviewed.
    pub fn is_pending(&self) -> bool {
        matches!(self, CreditStatus::Pending)
    }
}

impl std::fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pending/settled credit entry linking an order to an affiliate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralCreditEntry {
    pub id: EntityId,
    pub referral_account_id: EntityId,
    pub order_id: EntityId,
    pub credit_earned: Money,
    pub status: CreditStatus,
    pub created_at: DateTime<Utc>,
}

impl ReferralCreditEntry {
    /// Creates a new pending entry for an order.
    pub fn pending(referral_account_id: EntityId, order_id: EntityId, credit_earned: Money) -> Self {
        Self {
            id: EntityId::new(),
            referral_account_id,
            order_id,
            credit_earned,
            status: CreditStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entries_start_pending() {
        let entry =
            ReferralCreditEntry::pending(EntityId::new(), EntityId::new(), Money::from_dinars(50));
        assert_eq!(entry.status, CreditStatus::Pending);
        assert!(entry.status.is_pending());
        assert_eq!(entry.credit_earned, Money::from_dinars(50));
    }

    #[test]
    fn credit_status_parse_roundtrip() {
        for s in [
            CreditStatus::Pending,
            CreditStatus::Approved,
            CreditStatus::Rejected,
        ] {
            assert_eq!(CreditStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(CreditStatus::parse("expired"), None);
    }

    #[test]
    fn settled_statuses_are_not_pending() {
        assert!(!CreditStatus::Approved.is_pending());
        assert!(!CreditStatus::Rejected.is_pending());
    }
}
