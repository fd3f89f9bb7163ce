//! Scenario runner for the storefront notification platform.
//!
//! Wires the bus, data store, correlator, notification service, and
//! publisher services together and replays the demo scenarios
//! against the fixture data set.
//!
//! Usage: `storefront-demo [order-shipped|order-complete|price-drop|payment-failed|promotion|all]`

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_core::status::CustomerSegment;
use storefront_data::DataStore;
use storefront_events::{EventBus, EventCorrelator};
use storefront_notify::delivery::ChannelSender;
use storefront_notify::{EmailSender, NotificationService, SmsSender};
use storefront_services::{BillingService, OrderingService, PricingService, PromotionsService};

/// One fully wired scenario environment, fresh per scenario so runs don't
/// contaminate each other's store state.
struct Demo {
    bus: Arc<EventBus>,
    store: Arc<DataStore>,
    email: Arc<EmailSender>,
    sms: Arc<SmsSender>,
    service: Arc<NotificationService>,
}

impl Demo {
    fn wire(fixtures: &str) -> anyhow::Result<Self> {
        let store = Arc::new(
            DataStore::from_fixture_dir(fixtures)
                .with_context(|| format!("loading fixtures from {fixtures}"))?,
        );
        let bus = Arc::new(EventBus::new());
        let email = Arc::new(EmailSender::new());
        let sms = Arc::new(SmsSender::new());

        let service = Arc::new(NotificationService::new(
            Arc::clone(&store) as Arc<dyn storefront_core::DataGateway>,
            Arc::new(EventCorrelator::new()),
            vec![
                Arc::clone(&email) as Arc<dyn ChannelSender>,
                Arc::clone(&sms) as Arc<dyn ChannelSender>,
            ],
        ));
        NotificationService::start(&service, &bus);

        // Audit subscriber: every published event at debug level.
        bus.subscribe_all_fn(|event| {
            tracing::debug!(event = %event, "Audit log");
            Ok(())
        });

        Ok(Self {
            bus,
            store,
            email,
            sms,
            service,
        })
    }

    fn summarize(&self, scenario: &str) {
        let log = self.service.delivery_log();
        let sent = log.iter().filter(|record| record.succeeded()).count();
        let failed = log.len() - sent;
        tracing::info!(
            scenario,
            events = self.bus.recent_events().len(),
            emails = self.email.sent_count(),
            sms = self.sms.sent_count(),
            sent,
            failed,
            "Scenario complete"
        );
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

/// Simple event: one order ships, its customer is notified on every
/// enabled channel.
async fn run_order_shipped(fixtures: &str) -> anyhow::Result<()> {
    tracing::info!("--- Scenario: order shipped ---");
    let demo = Demo::wire(fixtures)?;
    let ordering = OrderingService::new(Arc::clone(&demo.bus), Arc::clone(&demo.store));

    ordering.ship_order("ord-001").await?;

    demo.summarize("order-shipped");
    Ok(())
}

/// Correlated events: items of one order ship separately; the customer
/// hears about it exactly once, when the last item ships.
async fn run_order_complete(fixtures: &str) -> anyhow::Result<()> {
    tracing::info!("--- Scenario: order complete ---");
    let demo = Demo::wire(fixtures)?;
    let ordering = OrderingService::new(Arc::clone(&demo.bus), Arc::clone(&demo.store));

    ordering.ship_line_item("ord-001", "prod-001").await?;
    tracing::info!(
        emails = demo.email.sent_count(),
        "First item shipped, no notification yet"
    );
    ordering.ship_line_item("ord-001", "prod-002").await?;

    demo.summarize("order-complete");
    Ok(())
}

/// Compound eligibility: a price drop alerts only opted-in customers in
/// eligible segments who hold the product in their cart.
async fn run_price_drop(fixtures: &str) -> anyhow::Result<()> {
    tracing::info!("--- Scenario: price drop ---");
    let demo = Demo::wire(fixtures)?;
    let pricing = PricingService::new(Arc::clone(&demo.bus), Arc::clone(&demo.store));

    pricing.update_price("prod-001", 119.99).await?;

    demo.summarize("price-drop");
    Ok(())
}

/// Medium complexity: a failed payment alerts the customer with the
/// failure reason.
async fn run_payment_failed(fixtures: &str) -> anyhow::Result<()> {
    tracing::info!("--- Scenario: payment failed ---");
    let demo = Demo::wire(fixtures)?;
    let billing = BillingService::new(Arc::clone(&demo.bus), Arc::clone(&demo.store));

    billing
        .record_failure("ord-001", "cust-001", 309.97, "card_declined", 1)
        .await?;

    demo.summarize("payment-failed");
    Ok(())
}

/// Promotion fan-out: eligible segments with the promotions preference
/// enabled hear about a new campaign.
async fn run_promotion(fixtures: &str) -> anyhow::Result<()> {
    tracing::info!("--- Scenario: promotion ---");
    let demo = Demo::wire(fixtures)?;
    let promotions = PromotionsService::new(Arc::clone(&demo.bus));

    promotions
        .activate_promotion(
            "promo-summer-sale",
            "Summer Sale",
            "20% off all networking equipment",
            vec![CustomerSegment::Gold, CustomerSegment::Platinum],
            "2026-08-31",
            Some("SUMMER20"),
        )
        .await;

    demo.summarize("promotion");
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=info,storefront_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let fixtures = std::env::var("STOREFRONT_FIXTURES")
        .unwrap_or_else(|_| "crates/data/fixtures".to_string());
    tracing::info!(fixtures = %fixtures, "Loaded configuration");

    let scenario = std::env::args().nth(1).unwrap_or_else(|| "all".to_string());
    match scenario.as_str() {
        "order-shipped" => run_order_shipped(&fixtures).await?,
        "order-complete" => run_order_complete(&fixtures).await?,
        "price-drop" => run_price_drop(&fixtures).await?,
        "payment-failed" => run_payment_failed(&fixtures).await?,
        "promotion" => run_promotion(&fixtures).await?,
        "all" => {
            run_order_shipped(&fixtures).await?;
            run_order_complete(&fixtures).await?;
            run_price_drop(&fixtures).await?;
            run_payment_failed(&fixtures).await?;
            run_promotion(&fixtures).await?;
        }
        other => {
            anyhow::bail!(
                "unknown scenario `{other}`; expected one of order-shipped, order-complete, \
                 price-drop, payment-failed, promotion, all"
            );
        }
    }

    Ok(())
}
