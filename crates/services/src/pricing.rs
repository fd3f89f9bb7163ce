//! Pricing/catalog simulator.
//!
//! Publishes [`PriceChanged`] events. Everything downstream — carts,
//! preferences, segments — is the notification service's problem; this
//! service only touches products.

use std::sync::Arc;

use storefront_core::{CoreError, DataGateway};
use storefront_data::DataStore;
use storefront_events::event::PriceChanged;
use storefront_events::{DomainEvent, EventBus, EventPayload};

const SOURCE: &str = "pricing-service";

/// Simulated pricing service publishing price change events.
pub struct PricingService {
    bus: Arc<EventBus>,
    store: Arc<DataStore>,
}

impl PricingService {
    pub fn new(bus: Arc<EventBus>, store: Arc<DataStore>) -> Self {
        Self { bus, store }
    }

    /// Set a product's price and publish the change.
    ///
    /// An unchanged price is a no-op: no event is published.
    pub async fn update_price(&self, product_id: &str, new_price: f64) -> Result<(), CoreError> {
        if new_price < 0.0 {
            return Err(CoreError::Validation(format!(
                "price must be non-negative, got {new_price}"
            )));
        }

        let product = self
            .store
            .product(product_id)
            .ok_or_else(|| CoreError::not_found("product", product_id))?;

        let previous_price = product.price;
        if previous_price == new_price {
            tracing::info!(product_id, price = new_price, "Price unchanged, no event");
            return Ok(());
        }

        self.store
            .update_product_price(product_id, new_price)
            .ok_or_else(|| CoreError::not_found("product", product_id))?;

        tracing::info!(
            product_id,
            name = %product.name,
            from = previous_price,
            to = new_price,
            "Price changed"
        );

        self.bus
            .publish(DomainEvent::new(
                SOURCE,
                EventPayload::PriceChanged(PriceChanged {
                    product_id: product_id.to_string(),
                    product_name: product.name,
                    previous_price,
                    new_price,
                }),
            ))
            .await;
        Ok(())
    }

    /// Apply a percentage discount, rounding the new price to cents.
    pub async fn apply_discount(
        &self,
        product_id: &str,
        discount_percent: f64,
    ) -> Result<(), CoreError> {
        if !(0.0..=100.0).contains(&discount_percent) {
            return Err(CoreError::Validation(format!(
                "discount must be between 0 and 100 percent, got {discount_percent}"
            )));
        }

        let product = self
            .store
            .product(product_id)
            .ok_or_else(|| CoreError::not_found("product", product_id))?;

        let new_price = (product.price * (1.0 - discount_percent / 100.0) * 100.0).round() / 100.0;
        tracing::info!(
            product_id,
            name = %product.name,
            discount_percent,
            "Applying discount"
        );
        self.update_price(product_id, new_price).await
    }
}
