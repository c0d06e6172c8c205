//! Order rows and their item snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{EntityId, Money, OrderCode};

/// Order lifecycle status. Mutated only by admin action after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting manual fulfillment.
    #[default]
    Pending,
    /// Fulfilled by the operator.
    Completed,
    /// Cancelled by the operator.
    Cancelled,
}

impl OrderStatus {
    /// Returns the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a stored status name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of an order snapshot.
///
/// The name and unit price are frozen at checkout time; later catalog edits
/// do not change what the order shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: EntityId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderLine {
    /// Creates a new order line.
    pub fn new(
        product_id: EntityId,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A persisted order.
///
/// Immutable after creation except for `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: EntityId,
    pub order_code: OrderCode,
    pub items: Vec<OrderLine>,

    /// Final amount after discount. May be negative when a fixed discount
    /// exceeds the subtotal; that is kept as-is.
    pub total_amount: Money,

    pub customer_email: String,
    pub discount_code: Option<String>,
    pub discount_amount: Money,
    pub referral_code: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
