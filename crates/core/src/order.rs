//! Order and line-item entities.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::status::{LineItemStatus, OrderStatus};
use crate::types::{CustomerId, OrderId, ProductId, Timestamp};

/// A single item within an order.
///
/// Items in one order are fulfilled independently; the per-item status is
/// what drives the order-complete correlation scenario.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LineItem {
    pub product_id: ProductId,
    #[validate(range(min = 1))]
    pub quantity: u32,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
    #[serde(default = "default_item_status")]
    pub status: LineItemStatus,
    #[serde(default)]
    pub shipped_at: Option<Timestamp>,
}

fn default_item_status() -> LineItemStatus {
    LineItemStatus::Pending
}

/// A customer purchase, composed of independently-fulfilled line items.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    #[serde(default = "default_order_status")]
    pub status: OrderStatus,
    #[serde(default)]
    #[validate(nested)]
    pub line_items: Vec<LineItem>,
    #[validate(range(min = 0.0))]
    pub total_amount: f64,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

fn default_order_status() -> OrderStatus {
    OrderStatus::Pending
}

impl Order {
    /// True when every line item has reached a terminal fulfilment state.
    ///
    /// An empty order is never considered complete.
    pub fn all_items_shipped_or_delivered(&self) -> bool {
        !self.line_items.is_empty()
            && self.line_items.iter().all(|item| item.status.is_terminal())
    }

    /// Count items that have not reached a terminal state yet.
    pub fn pending_items_count(&self) -> usize {
        self.line_items
            .iter()
            .filter(|item| !item.status.is_terminal())
            .count()
    }

    /// Line item for a specific product, if the order contains it.
    pub fn line_item(&self, product_id: &str) -> Option<&LineItem> {
        self.line_items
            .iter()
            .find(|item| item.product_id == product_id)
    }
}
