//! Payment attempt records.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::status::PaymentStatus;
use crate::types::{CustomerId, OrderId, PaymentId, Timestamp};

/// A payment attempt against an order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(default = "default_status")]
    pub status: PaymentStatus,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default = "default_attempt")]
    pub attempt_number: u32,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: Timestamp,
}

fn default_status() -> PaymentStatus {
    PaymentStatus::Pending
}

fn default_attempt() -> u32 {
    1
}
