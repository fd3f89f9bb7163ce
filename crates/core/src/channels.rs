//! Delivery channels and notification categories.
//!
//! These must match the channel and category values stored in the
//! `notification_preferences.json` fixture and referenced by the
//! notification service and delivery senders.

use serde::{Deserialize, Serialize};

/// A delivery channel a notification can be sent over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The business category a notification belongs to.
///
/// Customers opt in or out of each category independently, per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Order status changes (shipped, delivered, complete).
    OrderUpdates,
    /// Price drops for products sitting in the customer's cart.
    PriceAlerts,
    /// Marketing and promotional messages.
    Promotions,
    /// Payment success/failure notices.
    PaymentAlerts,
}

impl NotificationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OrderUpdates => "order_updates",
            Self::PriceAlerts => "price_alerts",
            Self::Promotions => "promotions",
            Self::PaymentAlerts => "payment_alerts",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
