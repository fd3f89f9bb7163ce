//! Integration tests for fixture loading and store queries.
//!
//! These exercise the real fixture files shipped with the crate, the same
//! data set the demo binary and the notification scenario tests run on.

use std::path::PathBuf;

use assert_matches::assert_matches;
use storefront_core::status::{CustomerSegment, LineItemStatus, OrderStatus};
use storefront_core::{Channel, DataGateway, NotificationCategory};
use storefront_data::{DataStore, StoreError};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn load() -> DataStore {
    DataStore::from_fixture_dir(fixture_dir()).expect("fixtures should load")
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn fixtures_load_and_collections_are_populated() {
    let store = load();

    assert!(store.customer("cust-001").is_some());
    assert!(store.product("prod-001").is_some());
    assert!(store.order("ord-001").is_some());
    assert!(store.payment("pay-9001").is_some());
}

#[test]
fn missing_fixture_dir_yields_empty_collections() {
    let store = DataStore::from_fixture_dir(fixture_dir().join("does-not-exist")).unwrap();

    assert!(store.customer("cust-001").is_none());
    assert!(store.carts_containing_product("prod-001").is_empty());
}

#[test]
fn malformed_fixture_is_a_parse_error() {
    let dir = std::env::temp_dir().join("storefront-data-malformed-fixture");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("customers.json"), "{ not json").unwrap();

    let result = DataStore::from_fixture_dir(&dir);

    assert_matches!(result, Err(StoreError::Parse { .. }));
}

#[test]
fn invalid_record_is_rejected_with_its_id() {
    let dir = std::env::temp_dir().join("storefront-data-invalid-record");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("customers.json"),
        r#"[{"id": "cust-bad", "name": "Bad", "email": "not-an-email", "phone": "+1-555-0000"}]"#,
    )
    .unwrap();

    let result = DataStore::from_fixture_dir(&dir);

    assert_matches!(
        result,
        Err(StoreError::InvalidRecord { file: "customers.json", id, .. }) if id == "cust-bad"
    );
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[test]
fn customer_lookup_returns_contact_details() {
    let store = load();

    let alice = store.customer("cust-001").unwrap();
    assert_eq!(alice.name, "Alice Johnson");
    assert_eq!(alice.email, "alice.johnson@example.com");
    assert_eq!(alice.segment, CustomerSegment::Gold);

    assert!(store.customer("cust-999").is_none());
}

#[test]
fn carts_containing_product_finds_all_owners() {
    let store = load();

    let carts = store.carts_containing_product("prod-001");
    let mut owners: Vec<_> = carts.iter().map(|cart| cart.customer_id.as_str()).collect();
    owners.sort_unstable();

    assert_eq!(owners, vec!["cust-002", "cust-003", "cust-005"]);
    assert!(store.carts_containing_product("prod-004").is_empty());
}

#[test]
fn customers_in_segment_filters_by_loyalty_tier() {
    let store = load();

    let mut gold: Vec<_> = store
        .customers_in_segment(CustomerSegment::Gold)
        .into_iter()
        .map(|customer| customer.id)
        .collect();
    gold.sort_unstable();

    assert_eq!(gold, vec!["cust-001", "cust-005"]);
    assert_eq!(store.customers_in_segment(CustomerSegment::Platinum).len(), 1);
}

#[test]
fn preference_matrix_matches_the_fixture_data_set() {
    let store = load();

    let alice = store.notification_preferences("cust-001").unwrap();
    assert_eq!(
        alice.channels_for(NotificationCategory::OrderUpdates),
        vec![Channel::Email, Channel::Sms]
    );

    let bob = store.notification_preferences("cust-002").unwrap();
    assert_eq!(
        bob.channels_for(NotificationCategory::OrderUpdates),
        vec![Channel::Email]
    );

    let david = store.notification_preferences("cust-004").unwrap();
    assert!(david.channels_for(NotificationCategory::PriceAlerts).is_empty());
}

#[test]
fn cart_lookup_returns_the_owners_items() {
    let store = load();

    let cart = store.cart("cust-005").unwrap();
    assert_eq!(cart.product_ids(), vec!["prod-001", "prod-005"]);
    assert!(cart.contains_product("prod-005"));

    // Alice has no cart in the fixtures.
    assert!(store.cart("cust-001").is_none());
}

#[test]
fn payments_for_order_returns_attempts() {
    let store = load();

    let payments = store.payments_for_order("ord-004");
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].failure_reason.as_deref(), Some("card_declined"));

    assert!(store.payments_for_order("ord-001").is_empty());
}

// ---------------------------------------------------------------------------
// Mutators
// ---------------------------------------------------------------------------

#[test]
fn update_order_status_stamps_updated_at() {
    let store = load();

    let order = store.update_order_status("ord-001", OrderStatus::Shipped).unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
    assert!(order.updated_at.is_some());

    assert!(store.update_order_status("ord-999", OrderStatus::Shipped).is_none());
}

#[test]
fn update_line_item_status_stamps_shipped_at_on_shipped() {
    let store = load();

    let order = store
        .update_line_item_status("ord-001", "prod-001", LineItemStatus::Shipped)
        .unwrap();
    let item = order.line_item("prod-001").unwrap();
    assert_eq!(item.status, LineItemStatus::Shipped);
    assert!(item.shipped_at.is_some());
    assert_eq!(order.pending_items_count(), 1);

    // Unknown line item is a no-op returning None.
    assert!(store
        .update_line_item_status("ord-001", "prod-999", LineItemStatus::Shipped)
        .is_none());
}

#[test]
fn update_product_price_changes_the_catalog_price() {
    let store = load();

    let product = store.update_product_price("prod-001", 119.99).unwrap();
    assert_eq!(product.price, 119.99);
    assert_eq!(store.product("prod-001").unwrap().price, 119.99);
}
