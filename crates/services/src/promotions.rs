//! Promotions simulator.
//!
//! Publishes [`PromotionActivated`] events carrying the eligibility
//! criteria. Deciding who actually hears about the promotion is the
//! notification service's job.

use std::sync::Arc;

use storefront_core::status::CustomerSegment;
use storefront_events::event::PromotionActivated;
use storefront_events::{DomainEvent, EventBus, EventPayload};

const SOURCE: &str = "promotions-service";

/// Simulated promotions service publishing campaign lifecycle events.
pub struct PromotionsService {
    bus: Arc<EventBus>,
}

impl PromotionsService {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    /// Activate a promotion and publish the event.
    pub async fn activate_promotion(
        &self,
        promotion_id: &str,
        name: &str,
        description: &str,
        eligible_segments: Vec<CustomerSegment>,
        end_date: &str,
        promo_code: Option<&str>,
    ) {
        tracing::info!(
            promotion_id,
            name,
            segments = eligible_segments.len(),
            "Activating promotion"
        );

        self.bus
            .publish(DomainEvent::new(
                SOURCE,
                EventPayload::PromotionActivated(PromotionActivated {
                    promotion_id: promotion_id.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    promo_code: promo_code.map(str::to_string),
                    eligible_segments,
                    end_date: end_date.to_string(),
                }),
            ))
            .await;
    }
}
