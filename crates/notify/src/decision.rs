//! Notification decision and delivery-outcome value types.

use storefront_core::types::{CustomerId, Timestamp};
use storefront_core::{Channel, NotificationCategory};

use crate::templates::RenderedMessage;

/// An ephemeral decision to notify one customer on one channel.
///
/// Produced by the notification service and handed straight to a channel
/// sender; never persisted.
#[derive(Debug, Clone)]
pub struct NotificationDecision {
    pub customer_id: CustomerId,
    pub category: NotificationCategory,
    pub channel: Channel,
    /// Email address or phone number, depending on the channel.
    pub address: String,
    pub message: RenderedMessage,
}

/// Outcome of handing one decision to its channel sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Failed(String),
}

/// Ledger entry for one attempted delivery.
#[derive(Debug, Clone)]
pub struct DeliveryRecord {
    pub customer_id: CustomerId,
    pub category: NotificationCategory,
    pub channel: Channel,
    pub status: DeliveryStatus,
    pub at: Timestamp,
}

impl DeliveryRecord {
    pub fn succeeded(&self) -> bool {
        self.status == DeliveryStatus::Sent
    }
}
