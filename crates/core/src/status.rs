//! Lifecycle status enums and customer segments.
//!
//! Wire forms match the values stored in the JSON fixtures and carried in
//! event payloads: statuses are SCREAMING_SNAKE_CASE (`"SHIPPED"`),
//! segments are lowercase (`"gold"`).

use serde::{Deserialize, Serialize};

/// Overall order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Fulfilment state of a single line item within an order.
///
/// Items in one order may ship at different times, which is what makes the
/// order-complete correlation scenario exist in the first place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineItemStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl LineItemStatus {
    /// True for the states that count toward aggregate completion.
    ///
    /// A cancelled item is final too, but it never completes an order.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Shipped | Self::Delivered)
    }
}

/// Payment attempt state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    RetryScheduled,
}

/// Customer loyalty segment, used by notification eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerSegment {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for LineItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_serialize_to_expected_wire_form() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Shipped).unwrap(),
            "\"SHIPPED\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::RetryScheduled).unwrap(),
            "\"RETRY_SCHEDULED\""
        );
        assert_eq!(
            serde_json::to_string(&CustomerSegment::Gold).unwrap(),
            "\"gold\""
        );
    }

    #[test]
    fn shipped_and_delivered_are_terminal() {
        assert!(LineItemStatus::Shipped.is_terminal());
        assert!(LineItemStatus::Delivered.is_terminal());
        assert!(!LineItemStatus::Pending.is_terminal());
        assert!(!LineItemStatus::Processing.is_terminal());
        assert!(!LineItemStatus::Cancelled.is_terminal());
    }
}
