//! Eligibility rules for outbound notifications.
//!
//! Pure predicates over already-fetched data — no I/O, no side effects —
//! so each rule is testable without a bus or data store. The notification
//! service evaluates them in a fixed order (preference, then segment,
//! then scenario condition) and stops at the first failure, which keeps
//! it from spending lookups on customers who opted out.

use storefront_core::status::CustomerSegment;
use storefront_core::{Channel, Customer, NotificationCategory, NotificationPreferences};
use storefront_events::event::PriceChanged;

/// Segments eligible for price drop alerts.
pub const PRICE_ALERT_ELIGIBLE_SEGMENTS: [CustomerSegment; 2] =
    [CustomerSegment::Gold, CustomerSegment::Platinum];

/// The channels a customer has enabled for a category.
///
/// `default_when_missing` is applied when the customer has no preference
/// record at all: order and payment notices default to email, while
/// price alerts and promotions require an explicit opt-in (empty default).
pub fn enabled_channels(
    preferences: Option<&NotificationPreferences>,
    category: NotificationCategory,
    default_when_missing: &[Channel],
) -> Vec<Channel> {
    match preferences {
        Some(preferences) => preferences.channels_for(category),
        None => default_when_missing.to_vec(),
    }
}

/// Whether the customer's segment is in the eligible set.
pub fn segment_eligible(customer: &Customer, eligible: &[CustomerSegment]) -> bool {
    eligible.contains(&customer.segment)
}

/// Scenario condition for price alerts: the price actually went down.
pub fn price_reduced(change: &PriceChanged) -> bool {
    change.is_decrease()
}
