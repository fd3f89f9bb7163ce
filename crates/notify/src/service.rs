//! Event-driven notification service.
//!
//! [`NotificationService`] is the sole consumer of the storefront event
//! bus. All "when to notify" logic lives here: the publishing services
//! just emit events and know nothing about notifications.
//!
//! Error policy: lookup failures (customer/order not found) and send
//! failures are absorbed — logged, recorded in the delivery ledger, and
//! never surfaced to the publisher. Configuration errors (an order with
//! no line items reaching the correlator) propagate through the bus's
//! dispatch report to whoever published the faulty event.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use storefront_core::status::{CustomerSegment, OrderStatus};
use storefront_core::{Channel, Customer, DataGateway, NotificationCategory, Order};
use storefront_events::bus::{EventBus, EventHandler, HandlerError, SubscriptionId};
use storefront_events::correlator::EventCorrelator;
use storefront_events::event::{
    DomainEvent, EventKind, EventPayload, LineItemStatusChanged, OrderStatusChanged,
    PaymentFailed, PriceChanged, PromotionActivated,
};

use crate::decision::{DeliveryRecord, DeliveryStatus, NotificationDecision};
use crate::delivery::ChannelSender;
use crate::eligibility;
use crate::templates::{self, format_item_list, ItemSummary, Notice};

/// Event kinds the service subscribes to on [`NotificationService::start`].
const SUBSCRIBED_KINDS: [EventKind; 5] = [
    EventKind::OrderStatusChanged,
    EventKind::LineItemStatusChanged,
    EventKind::PaymentFailed,
    EventKind::PriceChanged,
    EventKind::PromotionActivated,
];

// ---------------------------------------------------------------------------
// NotificationService
// ---------------------------------------------------------------------------

/// Turns domain events into notification decisions and hands them to the
/// channel senders.
pub struct NotificationService {
    gateway: Arc<dyn DataGateway>,
    correlator: Arc<EventCorrelator>,
    senders: HashMap<Channel, Arc<dyn ChannelSender>>,
    price_alert_segments: Vec<CustomerSegment>,
    ledger: Mutex<Vec<DeliveryRecord>>,
    subscriptions: Mutex<Vec<(EventKind, SubscriptionId)>>,
}

impl NotificationService {
    /// Create a service over the given collaborators. Later senders for
    /// the same channel replace earlier ones.
    pub fn new(
        gateway: Arc<dyn DataGateway>,
        correlator: Arc<EventCorrelator>,
        senders: Vec<Arc<dyn ChannelSender>>,
    ) -> Self {
        let senders = senders
            .into_iter()
            .map(|sender| (sender.channel(), sender))
            .collect();
        Self {
            gateway,
            correlator,
            senders,
            price_alert_segments: eligibility::PRICE_ALERT_ELIGIBLE_SEGMENTS.to_vec(),
            ledger: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Override the segments eligible for price drop alerts.
    pub fn with_price_alert_segments(mut self, segments: Vec<CustomerSegment>) -> Self {
        self.price_alert_segments = segments;
        self
    }

    /// Subscribe `service` to all event kinds it handles.
    ///
    /// An associated function because the bus needs an owning handle to
    /// the service. Idempotent: a second call while started is a no-op.
    pub fn start(service: &Arc<Self>, bus: &EventBus) {
        let mut subscriptions = service.subscriptions.lock().expect("subscriptions poisoned");
        if !subscriptions.is_empty() {
            tracing::warn!("Notification service already started");
            return;
        }
        for kind in SUBSCRIBED_KINDS {
            let handler: Arc<dyn EventHandler> = Arc::clone(service) as Arc<dyn EventHandler>;
            subscriptions.push((kind, bus.subscribe(kind, handler)));
        }
        tracing::info!("Notification service started, subscribed to events");
    }

    /// Unsubscribe from the bus; events published afterwards are ignored.
    pub fn stop(&self, bus: &EventBus) {
        let mut subscriptions = self.subscriptions.lock().expect("subscriptions poisoned");
        for (kind, id) in subscriptions.drain(..) {
            bus.unsubscribe(kind, id);
        }
        tracing::info!("Notification service stopped");
    }

    /// Every delivery attempted so far, oldest first — the aggregated
    /// outcome of all handled events.
    pub fn delivery_log(&self) -> Vec<DeliveryRecord> {
        self.ledger.lock().expect("ledger poisoned").clone()
    }

    // -- event flows -------------------------------------------------------

    async fn on_order_status_changed(&self, change: &OrderStatusChanged) {
        tracing::info!(
            order_id = %change.order_id,
            status = %change.new_status,
            "Handling order status change"
        );
        match change.new_status {
            OrderStatus::Shipped => {
                self.notify_order_event(&change.order_id, &change.customer_id, false)
                    .await;
            }
            OrderStatus::Delivered => {
                self.notify_order_event(&change.order_id, &change.customer_id, true)
                    .await;
            }
            _ => {}
        }
    }

    /// Shared flow for the shipped/delivered notifications.
    async fn notify_order_event(&self, order_id: &str, customer_id: &str, delivered: bool) {
        let Some(customer) = self.lookup_customer(customer_id) else {
            return;
        };
        let preferences = self.gateway.notification_preferences(customer_id);
        let channels = eligibility::enabled_channels(
            preferences.as_ref(),
            NotificationCategory::OrderUpdates,
            &[Channel::Email],
        );
        if channels.is_empty() {
            tracing::info!(customer_id, "Customer has disabled order update notifications");
            return;
        }

        let notice = if delivered {
            Notice::OrderDelivered {
                customer_name: customer.name.clone(),
                order_id: order_id.to_string(),
            }
        } else {
            let Some(order) = self.lookup_order(order_id) else {
                return;
            };
            Notice::OrderShipped {
                customer_name: customer.name.clone(),
                order_id: order_id.to_string(),
                item_list: format_item_list(&self.item_summaries(&order)),
            }
        };

        self.dispatch_to_channels(&customer, &notice, &channels).await;
    }

    async fn on_line_item_status_changed(
        &self,
        change: &LineItemStatusChanged,
    ) -> Result<(), HandlerError> {
        if !change.new_status.is_terminal() {
            return Ok(());
        }

        tracing::info!(
            order_id = %change.order_id,
            product_id = %change.product_id,
            "Handling line item status change"
        );

        let Some(order) = self.lookup_order(&change.order_id) else {
            return Ok(());
        };
        let expected: BTreeSet<String> = order
            .line_items
            .iter()
            .map(|item| item.product_id.clone())
            .collect();

        // An order with no line items is a configuration problem; let the
        // correlator's error reach the publisher's dispatch report.
        let completion =
            self.correlator
                .observe(&change.order_id, &change.product_id, &expected, true)?;

        if let Some(completion) = completion {
            self.notify_order_complete(&completion.aggregate_id, &change.customer_id)
                .await;
        }
        Ok(())
    }

    /// Fired by the correlator's completion signal, exactly once per order.
    async fn notify_order_complete(&self, order_id: &str, customer_id: &str) {
        let Some(customer) = self.lookup_customer(customer_id) else {
            return;
        };
        let Some(order) = self.lookup_order(order_id) else {
            return;
        };
        let preferences = self.gateway.notification_preferences(customer_id);
        let channels = eligibility::enabled_channels(
            preferences.as_ref(),
            NotificationCategory::OrderUpdates,
            &[Channel::Email],
        );
        if channels.is_empty() {
            return;
        }

        let notice = Notice::OrderComplete {
            customer_name: customer.name.clone(),
            order_id: order_id.to_string(),
            item_list: format_item_list(&self.item_summaries(&order)),
            item_count: order.line_items.len(),
        };
        self.dispatch_to_channels(&customer, &notice, &channels).await;
    }

    async fn on_payment_failed(&self, failure: &PaymentFailed) {
        tracing::info!(
            payment_id = %failure.payment_id,
            order_id = %failure.order_id,
            "Handling payment failure"
        );

        let Some(customer) = self.lookup_customer(&failure.customer_id) else {
            return;
        };
        let preferences = self.gateway.notification_preferences(&failure.customer_id);
        let channels = eligibility::enabled_channels(
            preferences.as_ref(),
            NotificationCategory::PaymentAlerts,
            &[Channel::Email],
        );
        if channels.is_empty() {
            tracing::info!(
                customer_id = %failure.customer_id,
                "Customer has disabled payment alert notifications"
            );
            return;
        }

        let notice = Notice::PaymentFailed {
            customer_name: customer.name.clone(),
            order_id: failure.order_id.clone(),
            amount: failure.amount,
            failure_reason: failure.failure_reason.clone(),
        };
        self.dispatch_to_channels(&customer, &notice, &channels).await;
    }

    async fn on_price_changed(&self, change: &PriceChanged) {
        let carts = self.gateway.carts_containing_product(&change.product_id);
        tracing::info!(
            product_id = %change.product_id,
            carts = carts.len(),
            "Handling price change"
        );

        let mut sent = 0usize;
        let mut skipped_preferences = 0usize;
        let mut skipped_segment = 0usize;

        for cart in carts {
            // Preference gate first: an opted-out customer costs no
            // further lookups.
            let preferences = self.gateway.notification_preferences(&cart.customer_id);
            let channels = eligibility::enabled_channels(
                preferences.as_ref(),
                NotificationCategory::PriceAlerts,
                &[],
            );
            if channels.is_empty() {
                skipped_preferences += 1;
                continue;
            }

            let Some(customer) = self.lookup_customer(&cart.customer_id) else {
                continue;
            };
            if !eligibility::segment_eligible(&customer, &self.price_alert_segments) {
                tracing::debug!(
                    customer_id = %customer.id,
                    segment = %customer.segment,
                    "Segment not eligible for price alerts"
                );
                skipped_segment += 1;
                continue;
            }

            if !eligibility::price_reduced(change) {
                tracing::debug!(product_id = %change.product_id, "Price did not decrease");
                continue;
            }

            let notice = Notice::PriceDropAlert {
                customer_name: customer.name.clone(),
                product_name: change.product_name.clone(),
                previous_price: change.previous_price,
                new_price: change.new_price,
            };
            sent += self.dispatch_to_channels(&customer, &notice, &channels).await;
        }

        tracing::info!(
            sent,
            skipped_preferences,
            skipped_segment,
            "Price drop notifications complete"
        );
    }

    async fn on_promotion_activated(&self, promotion: &PromotionActivated) {
        tracing::info!(
            promotion_id = %promotion.promotion_id,
            segments = promotion.eligible_segments.len(),
            "Handling promotion activation"
        );

        for segment in &promotion.eligible_segments {
            for customer in self.gateway.customers_in_segment(*segment) {
                let preferences = self.gateway.notification_preferences(&customer.id);
                // Marketing requires an explicit opt-in: no default.
                let channels = eligibility::enabled_channels(
                    preferences.as_ref(),
                    NotificationCategory::Promotions,
                    &[],
                );
                if channels.is_empty() {
                    continue;
                }

                let notice = Notice::PromotionAvailable {
                    customer_name: customer.name.clone(),
                    name: promotion.name.clone(),
                    description: promotion.description.clone(),
                    promo_code: promotion.promo_code.clone(),
                    end_date: promotion.end_date.clone(),
                };
                self.dispatch_to_channels(&customer, &notice, &channels).await;
            }
        }
    }

    // -- dispatch ----------------------------------------------------------

    /// Render and send one notice over each channel; returns how many
    /// sends succeeded. A failed send is recorded and never stops the
    /// remaining channels.
    async fn dispatch_to_channels(
        &self,
        customer: &Customer,
        notice: &Notice,
        channels: &[Channel],
    ) -> usize {
        let mut sent = 0;
        for channel in channels {
            let decision = NotificationDecision {
                customer_id: customer.id.clone(),
                category: notice.category(),
                channel: *channel,
                address: match channel {
                    Channel::Email => customer.email.clone(),
                    Channel::Sms => customer.phone.clone(),
                },
                message: templates::render(notice, *channel),
            };
            if self.deliver(decision).await {
                sent += 1;
            }
        }
        sent
    }

    /// Hand one decision to its channel sender and record the outcome.
    async fn deliver(&self, decision: NotificationDecision) -> bool {
        let status = match self.senders.get(&decision.channel) {
            Some(sender) => match sender.send(&decision.address, &decision.message).await {
                Ok(()) => {
                    tracing::info!(
                        customer_id = %decision.customer_id,
                        channel = %decision.channel,
                        category = %decision.category,
                        "Sent notification"
                    );
                    DeliveryStatus::Sent
                }
                Err(error) => {
                    tracing::error!(
                        customer_id = %decision.customer_id,
                        channel = %decision.channel,
                        error = %error,
                        "Failed to send notification"
                    );
                    DeliveryStatus::Failed(error.to_string())
                }
            },
            None => {
                tracing::error!(
                    channel = %decision.channel,
                    "No sender configured for channel"
                );
                DeliveryStatus::Failed(format!(
                    "no sender configured for channel {}",
                    decision.channel
                ))
            }
        };

        let succeeded = status == DeliveryStatus::Sent;
        self.ledger.lock().expect("ledger poisoned").push(DeliveryRecord {
            customer_id: decision.customer_id,
            category: decision.category,
            channel: decision.channel,
            status,
            at: chrono::Utc::now(),
        });
        succeeded
    }

    // -- lookups -----------------------------------------------------------

    fn lookup_customer(&self, customer_id: &str) -> Option<Customer> {
        let customer = self.gateway.customer(customer_id);
        if customer.is_none() {
            tracing::error!(customer_id, "Customer not found");
        }
        customer
    }

    fn lookup_order(&self, order_id: &str) -> Option<Order> {
        let order = self.gateway.order(order_id);
        if order.is_none() {
            tracing::error!(order_id, "Order not found");
        }
        order
    }

    fn item_summaries(&self, order: &Order) -> Vec<ItemSummary> {
        order
            .line_items
            .iter()
            .filter_map(|item| {
                let product = self.gateway.product(&item.product_id)?;
                Some(ItemSummary {
                    name: product.name,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
            })
            .collect()
    }
}

#[async_trait]
impl EventHandler for NotificationService {
    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError> {
        match &event.payload {
            EventPayload::OrderStatusChanged(change) => {
                self.on_order_status_changed(change).await;
                Ok(())
            }
            EventPayload::LineItemStatusChanged(change) => {
                self.on_line_item_status_changed(change).await
            }
            EventPayload::PaymentFailed(failure) => {
                self.on_payment_failed(failure).await;
                Ok(())
            }
            EventPayload::PriceChanged(change) => {
                self.on_price_changed(change).await;
                Ok(())
            }
            EventPayload::PromotionActivated(promotion) => {
                self.on_promotion_activated(promotion).await;
                Ok(())
            }
            // Kinds the service does not subscribe to.
            _ => Ok(()),
        }
    }
}
