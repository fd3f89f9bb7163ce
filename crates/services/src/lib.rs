//! Domain publisher services.
//!
//! Thin simulators for the order, pricing, billing, and promotion domains:
//! each mutates the data store and publishes events describing what
//! happened. None of them know that a notification service exists — that
//! decoupling is the point of the event-driven design.

pub mod billing;
pub mod ordering;
pub mod pricing;
pub mod promotions;

pub use billing::BillingService;
pub use ordering::OrderingService;
pub use pricing::PricingService;
pub use promotions::PromotionsService;
