//! Billing/payment simulator.
//!
//! Records payment attempts and publishes the attempt plus its outcome.
//! Payment ids are generated from an internal counter (`pay-0001`, …).

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use storefront_core::status::PaymentStatus;
use storefront_core::types::PaymentId;
use storefront_core::{CoreError, Payment};
use storefront_data::DataStore;
use storefront_events::event::{PaymentAttempted, PaymentFailed, PaymentSucceeded};
use storefront_events::{DomainEvent, EventBus, EventPayload};

const SOURCE: &str = "billing-service";

/// Simulated billing service publishing payment outcome events.
pub struct BillingService {
    bus: Arc<EventBus>,
    store: Arc<DataStore>,
    payment_counter: AtomicU32,
}

impl BillingService {
    pub fn new(bus: Arc<EventBus>, store: Arc<DataStore>) -> Self {
        Self {
            bus,
            store,
            payment_counter: AtomicU32::new(0),
        }
    }

    fn next_payment_id(&self) -> PaymentId {
        let n = self.payment_counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("pay-{n:04}")
    }

    /// Record a successful payment and publish attempt + success events.
    pub async fn record_success(
        &self,
        order_id: &str,
        customer_id: &str,
        amount: f64,
    ) -> Result<PaymentId, CoreError> {
        let payment_id = self.next_payment_id();
        self.publish_attempt(&payment_id, order_id, customer_id, amount, 1)
            .await;

        self.store.insert_payment(Payment {
            id: payment_id.clone(),
            order_id: order_id.to_string(),
            customer_id: customer_id.to_string(),
            amount,
            status: PaymentStatus::Success,
            failure_reason: None,
            attempt_number: 1,
            created_at: chrono::Utc::now(),
        });

        tracing::info!(payment_id = %payment_id, order_id, amount, "Payment succeeded");
        self.bus
            .publish(DomainEvent::new(
                SOURCE,
                EventPayload::PaymentSucceeded(PaymentSucceeded {
                    payment_id: payment_id.clone(),
                    order_id: order_id.to_string(),
                    customer_id: customer_id.to_string(),
                    amount,
                }),
            ))
            .await;
        Ok(payment_id)
    }

    /// Record a failed payment attempt and publish attempt + failure
    /// events.
    pub async fn record_failure(
        &self,
        order_id: &str,
        customer_id: &str,
        amount: f64,
        failure_reason: &str,
        attempt_number: u32,
    ) -> Result<PaymentId, CoreError> {
        let payment_id = self.next_payment_id();
        self.publish_attempt(&payment_id, order_id, customer_id, amount, attempt_number)
            .await;

        self.store.insert_payment(Payment {
            id: payment_id.clone(),
            order_id: order_id.to_string(),
            customer_id: customer_id.to_string(),
            amount,
            status: PaymentStatus::Failed,
            failure_reason: Some(failure_reason.to_string()),
            attempt_number,
            created_at: chrono::Utc::now(),
        });

        tracing::warn!(
            payment_id = %payment_id,
            order_id,
            reason = failure_reason,
            "Payment failed"
        );
        self.bus
            .publish(DomainEvent::new(
                SOURCE,
                EventPayload::PaymentFailed(PaymentFailed {
                    payment_id: payment_id.clone(),
                    order_id: order_id.to_string(),
                    customer_id: customer_id.to_string(),
                    amount,
                    failure_reason: failure_reason.to_string(),
                    attempt_number,
                }),
            ))
            .await;
        Ok(payment_id)
    }

    async fn publish_attempt(
        &self,
        payment_id: &str,
        order_id: &str,
        customer_id: &str,
        amount: f64,
        attempt_number: u32,
    ) {
        self.bus
            .publish(DomainEvent::new(
                SOURCE,
                EventPayload::PaymentAttempted(PaymentAttempted {
                    payment_id: payment_id.to_string(),
                    order_id: order_id.to_string(),
                    customer_id: customer_id.to_string(),
                    amount,
                    attempt_number,
                }),
            ))
            .await;
    }
}
