//! Order management simulator.
//!
//! Publishes [`OrderCreated`], [`OrderStatusChanged`], and
//! [`LineItemStatusChanged`] events as orders move through their
//! lifecycle. Only publishes — it never calls the notification service
//! and does not know it exists.

use std::sync::Arc;

use storefront_core::status::{LineItemStatus, OrderStatus};
use storefront_core::{CoreError, DataGateway, Order};
use storefront_data::DataStore;
use storefront_events::event::{
    LineItemStatusChanged, OrderCreated, OrderStatusChanged,
};
use storefront_events::{DomainEvent, EventBus, EventPayload};

const SOURCE: &str = "ordering-service";

/// Simulated ordering service publishing order lifecycle events.
pub struct OrderingService {
    bus: Arc<EventBus>,
    store: Arc<DataStore>,
}

impl OrderingService {
    pub fn new(bus: Arc<EventBus>, store: Arc<DataStore>) -> Self {
        Self { bus, store }
    }

    /// Record a new order and publish [`OrderCreated`].
    pub async fn create_order(&self, order: Order) -> Result<(), CoreError> {
        if self.store.order(&order.id).is_some() {
            return Err(CoreError::Conflict(format!(
                "order {} already exists",
                order.id
            )));
        }

        let payload = EventPayload::OrderCreated(OrderCreated {
            order_id: order.id.clone(),
            customer_id: order.customer_id.clone(),
            line_item_count: order.line_items.len(),
            total_amount: order.total_amount,
        });
        tracing::info!(order_id = %order.id, "Order created");
        self.store.insert_order(order);
        self.bus.publish(DomainEvent::new(SOURCE, payload)).await;
        Ok(())
    }

    /// Mark an order shipped and publish the status change.
    pub async fn ship_order(&self, order_id: &str) -> Result<(), CoreError> {
        let order = self
            .store
            .order(order_id)
            .ok_or_else(|| CoreError::not_found("order", order_id))?;

        if order.status == OrderStatus::Shipped {
            return Err(CoreError::Conflict(format!(
                "order {order_id} already shipped"
            )));
        }

        self.transition_order(&order, OrderStatus::Shipped).await
    }

    /// Mark an order delivered and publish the status change.
    pub async fn deliver_order(&self, order_id: &str) -> Result<(), CoreError> {
        let order = self
            .store
            .order(order_id)
            .ok_or_else(|| CoreError::not_found("order", order_id))?;

        self.transition_order(&order, OrderStatus::Delivered).await
    }

    async fn transition_order(
        &self,
        order: &Order,
        new_status: OrderStatus,
    ) -> Result<(), CoreError> {
        let previous_status = order.status;
        self.store
            .update_order_status(&order.id, new_status)
            .ok_or_else(|| CoreError::not_found("order", &order.id))?;

        tracing::info!(
            order_id = %order.id,
            from = %previous_status,
            to = %new_status,
            "Order status changed"
        );

        self.bus
            .publish(DomainEvent::new(
                SOURCE,
                EventPayload::OrderStatusChanged(OrderStatusChanged {
                    order_id: order.id.clone(),
                    customer_id: order.customer_id.clone(),
                    previous_status,
                    new_status,
                }),
            ))
            .await;
        Ok(())
    }

    /// Ship one line item within an order and publish the change.
    ///
    /// Items in an order ship independently; the published event carries
    /// how many items are still short of a terminal state.
    pub async fn ship_line_item(&self, order_id: &str, product_id: &str) -> Result<(), CoreError> {
        let order = self
            .store
            .order(order_id)
            .ok_or_else(|| CoreError::not_found("order", order_id))?;

        let item = order
            .line_item(product_id)
            .ok_or_else(|| CoreError::not_found("line item", product_id))?;
        let previous_status = item.status;

        let updated = self
            .store
            .update_line_item_status(order_id, product_id, LineItemStatus::Shipped)
            .ok_or_else(|| CoreError::not_found("line item", product_id))?;

        let items_remaining = updated.pending_items_count();
        tracing::info!(
            order_id,
            product_id,
            items_remaining,
            "Line item shipped"
        );

        let report = self
            .bus
            .publish(DomainEvent::new(
                SOURCE,
                EventPayload::LineItemStatusChanged(LineItemStatusChanged {
                    order_id: order_id.to_string(),
                    customer_id: order.customer_id.clone(),
                    product_id: product_id.to_string(),
                    previous_status,
                    new_status: LineItemStatus::Shipped,
                    items_remaining,
                }),
            ))
            .await;
        if !report.all_succeeded() {
            tracing::warn!(
                order_id,
                failures = report.failures.len(),
                "Handlers reported failures for line item event"
            );
        }
        Ok(())
    }
}
