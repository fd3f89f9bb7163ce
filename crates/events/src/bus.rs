//! In-process typed publish/subscribe event bus.
//!
//! [`EventBus`] is the central hub domain services publish
//! [`DomainEvent`]s to. It is designed to be shared via `Arc<EventBus>`
//! across the application — an owned instance, never a process-wide
//! singleton, so independent test fixtures can each run their own bus.
//!
//! Delivery contract:
//!
//! - Handlers subscribed to an event's kind receive it synchronously, in
//!   registration order, followed by wildcard subscribers in registration
//!   order. There is no ordering guarantee *across* kinds.
//! - A handler error is captured in the [`DispatchReport`] returned to the
//!   publisher and never prevents delivery to the remaining handlers.
//! - Dispatch iterates over a snapshot of the registry taken when
//!   [`publish`](EventBus::publish) is called. Subscriptions added or
//!   removed by a handler mid-dispatch take effect for subsequent
//!   publishes only.
//!
//! The bus also keeps a bounded log of recently published events for
//! diagnostics; it is not part of the delivery contract.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::event::{DomainEvent, EventKind};

/// Default capacity of the diagnostics event log.
const DEFAULT_LOG_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// EventHandler
// ---------------------------------------------------------------------------

/// Error type handlers report back to the bus.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A subscriber callback for published events.
///
/// Handlers observe events by reference only; the bus owns the event for
/// the duration of the dispatch.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError>;
}

/// Adapter so plain closures can subscribe without a named handler type.
struct FnHandler<F>(F);

#[async_trait]
impl<F> EventHandler for FnHandler<F>
where
    F: Fn(&DomainEvent) -> Result<(), HandlerError> + Send + Sync,
{
    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError> {
        (self.0)(event)
    }
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// Opaque handle identifying one subscription, returned by the subscribe
/// methods and accepted by the unsubscribe methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
struct Subscription {
    id: SubscriptionId,
    handler: Arc<dyn EventHandler>,
}

#[derive(Default)]
struct Registry {
    by_kind: HashMap<EventKind, Vec<Subscription>>,
    wildcard: Vec<Subscription>,
}

// ---------------------------------------------------------------------------
// DispatchReport
// ---------------------------------------------------------------------------

/// One handler's failure during a dispatch.
#[derive(Debug, Clone)]
pub struct HandlerFailure {
    pub subscription: SubscriptionId,
    pub message: String,
}

/// Per-handler outcome of one `publish` call.
///
/// Recoverable handler failures are recorded here rather than thrown; the
/// publisher decides whether to care.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub event_id: Uuid,
    pub kind: EventKind,
    /// Number of handlers the event was delivered to.
    pub handled: usize,
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    /// True when every handler processed the event without error.
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// In-process typed fan-out event bus.
pub struct EventBus {
    registry: RwLock<Registry>,
    log: Mutex<VecDeque<DomainEvent>>,
    log_capacity: usize,
    next_id: AtomicU64,
}

impl EventBus {
    /// Create a bus with the default diagnostics log capacity.
    pub fn new() -> Self {
        Self::with_log_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// Create a bus that retains the last `capacity` published events.
    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            log: Mutex::new(VecDeque::with_capacity(capacity)),
            log_capacity: capacity,
            next_id: AtomicU64::new(1),
        }
    }

    fn allocate_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a handler for one event kind.
    pub fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) -> SubscriptionId {
        let id = self.allocate_id();
        let mut registry = self.registry.write().expect("subscriber registry poisoned");
        registry
            .by_kind
            .entry(kind)
            .or_default()
            .push(Subscription { id, handler });
        tracing::debug!(kind = %kind, subscription = id.0, "Subscribed handler");
        id
    }

    /// Register a closure for one event kind.
    pub fn subscribe_fn<F>(&self, kind: EventKind, f: F) -> SubscriptionId
    where
        F: Fn(&DomainEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.subscribe(kind, Arc::new(FnHandler(f)))
    }

    /// Register a handler for every event kind (audit/diagnostics use).
    pub fn subscribe_all(&self, handler: Arc<dyn EventHandler>) -> SubscriptionId {
        let id = self.allocate_id();
        let mut registry = self.registry.write().expect("subscriber registry poisoned");
        registry.wildcard.push(Subscription { id, handler });
        tracing::debug!(subscription = id.0, "Subscribed handler to all events");
        id
    }

    /// Register a closure for every event kind.
    pub fn subscribe_all_fn<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&DomainEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.subscribe_all(Arc::new(FnHandler(f)))
    }

    /// Remove a kind subscription. Returns whether it was found.
    pub fn unsubscribe(&self, kind: EventKind, id: SubscriptionId) -> bool {
        let mut registry = self.registry.write().expect("subscriber registry poisoned");
        let Some(subscriptions) = registry.by_kind.get_mut(&kind) else {
            return false;
        };
        let before = subscriptions.len();
        subscriptions.retain(|sub| sub.id != id);
        before != subscriptions.len()
    }

    /// Remove a wildcard subscription. Returns whether it was found.
    pub fn unsubscribe_all(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.write().expect("subscriber registry poisoned");
        let before = registry.wildcard.len();
        registry.wildcard.retain(|sub| sub.id != id);
        before != registry.wildcard.len()
    }

    /// Number of handlers subscribed to a kind (wildcards not counted).
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        let registry = self.registry.read().expect("subscriber registry poisoned");
        registry.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Publish an event to every subscriber of its kind, then to wildcard
    /// subscribers, in registration order.
    ///
    /// Handler errors are collected into the returned [`DispatchReport`];
    /// they never abort the dispatch or surface as an `Err`.
    pub async fn publish(&self, event: DomainEvent) -> DispatchReport {
        {
            let mut log = self.log.lock().expect("event log poisoned");
            if log.len() == self.log_capacity && self.log_capacity > 0 {
                log.pop_front();
            }
            if self.log_capacity > 0 {
                log.push_back(event.clone());
            }
        }

        tracing::info!(event = %event, "Publishing");

        // Snapshot under the read lock, dispatch outside it. Handlers are
        // free to (un)subscribe during dispatch; the snapshot defers the
        // change to the next publish.
        let snapshot: Vec<Subscription> = {
            let registry = self.registry.read().expect("subscriber registry poisoned");
            registry
                .by_kind
                .get(&event.kind())
                .into_iter()
                .flatten()
                .chain(registry.wildcard.iter())
                .cloned()
                .collect()
        };

        if snapshot.is_empty() {
            tracing::warn!(kind = %event.kind(), "No handlers for event kind");
        }

        let mut failures = Vec::new();
        for subscription in &snapshot {
            if let Err(error) = subscription.handler.handle(&event).await {
                tracing::error!(
                    subscription = subscription.id.0,
                    event = %event,
                    error = %error,
                    "Handler failed"
                );
                failures.push(HandlerFailure {
                    subscription: subscription.id,
                    message: error.to_string(),
                });
            }
        }

        DispatchReport {
            event_id: event.id,
            kind: event.kind(),
            handled: snapshot.len(),
            failures,
        }
    }

    /// The most recently published events, oldest first (diagnostics).
    pub fn recent_events(&self) -> Vec<DomainEvent> {
        let log = self.log.lock().expect("event log poisoned");
        log.iter().cloned().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventPayload, OrderCreated, PriceChanged};

    fn order_created_event(order_id: &str) -> DomainEvent {
        DomainEvent::new(
            "ordering-service",
            EventPayload::OrderCreated(OrderCreated {
                order_id: order_id.to_string(),
                customer_id: "cust-001".to_string(),
                line_item_count: 2,
                total_amount: 309.97,
            }),
        )
    }

    fn price_changed_event() -> DomainEvent {
        DomainEvent::new(
            "pricing-service",
            EventPayload::PriceChanged(PriceChanged {
                product_id: "prod-001".to_string(),
                product_name: "Wireless Router X500".to_string(),
                previous_price: 149.99,
                new_price: 119.99,
            }),
        )
    }

    #[tokio::test]
    async fn delivers_to_subscribers_in_registration_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            bus.subscribe_fn(EventKind::OrderCreated, move |_| {
                seen.lock().unwrap().push(label);
                Ok(())
            });
        }

        let report = bus.publish(order_created_event("ord-001")).await;

        assert_eq!(report.handled, 3);
        assert!(report.all_succeeded());
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn handler_failure_does_not_block_later_handlers() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let failing = bus.subscribe_fn(EventKind::OrderCreated, |_| Err("boom".into()));
        let seen_clone = Arc::clone(&seen);
        bus.subscribe_fn(EventKind::OrderCreated, move |_| {
            seen_clone.lock().unwrap().push("survivor");
            Ok(())
        });

        let report = bus.publish(order_created_event("ord-001")).await;

        assert_eq!(report.handled, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].subscription, failing);
        assert_eq!(report.failures[0].message, "boom");
        assert_eq!(*seen.lock().unwrap(), vec!["survivor"]);
    }

    #[tokio::test]
    async fn failure_on_one_kind_does_not_affect_another_kind() {
        let bus = EventBus::new();
        let delivered = Arc::new(Mutex::new(0usize));

        bus.subscribe_fn(EventKind::OrderCreated, |_| Err("bad handler".into()));
        let delivered_clone = Arc::clone(&delivered);
        bus.subscribe_fn(EventKind::PriceChanged, move |_| {
            *delivered_clone.lock().unwrap() += 1;
            Ok(())
        });

        bus.publish(order_created_event("ord-001")).await;
        let report = bus.publish(price_changed_event()).await;

        assert!(report.all_succeeded());
        assert_eq!(*delivered.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn wildcard_subscriber_sees_every_kind_after_kind_handlers() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        bus.subscribe_all_fn(move |event| {
            seen_clone.lock().unwrap().push(format!("audit:{}", event.kind()));
            Ok(())
        });
        let seen_clone = Arc::clone(&seen);
        bus.subscribe_fn(EventKind::OrderCreated, move |_| {
            seen_clone.lock().unwrap().push("typed".to_string());
            Ok(())
        });

        bus.publish(order_created_event("ord-001")).await;
        bus.publish(price_changed_event()).await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "typed".to_string(),
                "audit:OrderCreated".to_string(),
                "audit:PriceChanged".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0usize));

        let count_clone = Arc::clone(&count);
        let id = bus.subscribe_fn(EventKind::OrderCreated, move |_| {
            *count_clone.lock().unwrap() += 1;
            Ok(())
        });

        bus.publish(order_created_event("ord-001")).await;
        assert!(bus.unsubscribe(EventKind::OrderCreated, id));
        bus.publish(order_created_event("ord-002")).await;

        assert_eq!(*count.lock().unwrap(), 1);
        // A second removal reports not-found.
        assert!(!bus.unsubscribe(EventKind::OrderCreated, id));
    }

    #[tokio::test]
    async fn subscription_during_dispatch_defers_to_next_publish() {
        let bus = Arc::new(EventBus::new());
        let late_calls = Arc::new(Mutex::new(0usize));

        let bus_clone = Arc::clone(&bus);
        let late_calls_clone = Arc::clone(&late_calls);
        bus.subscribe_fn(EventKind::OrderCreated, move |_| {
            let late_calls = Arc::clone(&late_calls_clone);
            bus_clone.subscribe_fn(EventKind::OrderCreated, move |_| {
                *late_calls.lock().unwrap() += 1;
                Ok(())
            });
            Ok(())
        });

        let report = bus.publish(order_created_event("ord-001")).await;
        // The freshly added handler was not part of this dispatch.
        assert_eq!(report.handled, 1);
        assert_eq!(*late_calls.lock().unwrap(), 0);

        bus.publish(order_created_event("ord-002")).await;
        assert_eq!(*late_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn wildcard_unsubscribe_stops_audit_delivery() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0usize));

        let count_clone = Arc::clone(&count);
        let id = bus.subscribe_all_fn(move |_| {
            *count_clone.lock().unwrap() += 1;
            Ok(())
        });

        bus.publish(order_created_event("ord-001")).await;
        assert!(bus.unsubscribe_all(id));
        bus.publish(price_changed_event()).await;

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(!bus.unsubscribe_all(id));
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_reports_zero_handlers() {
        let bus = EventBus::new();
        let report = bus.publish(order_created_event("ord-001")).await;
        assert_eq!(report.handled, 0);
        assert!(report.all_succeeded());
    }

    #[tokio::test]
    async fn event_log_is_bounded() {
        let bus = EventBus::with_log_capacity(2);

        bus.publish(order_created_event("ord-001")).await;
        bus.publish(order_created_event("ord-002")).await;
        bus.publish(order_created_event("ord-003")).await;

        let logged: Vec<String> = bus
            .recent_events()
            .iter()
            .map(|event| match &event.payload {
                EventPayload::OrderCreated(created) => created.order_id.clone(),
                other => panic!("unexpected payload: {:?}", other.kind()),
            })
            .collect();
        assert_eq!(logged, vec!["ord-002", "ord-003"]);
    }

    #[tokio::test]
    async fn subscriber_count_tracks_kind_registrations() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(EventKind::PriceChanged), 0);

        bus.subscribe_fn(EventKind::PriceChanged, |_| Ok(()));
        bus.subscribe_fn(EventKind::PriceChanged, |_| Ok(()));
        bus.subscribe_all_fn(|_| Ok(()));

        assert_eq!(bus.subscriber_count(EventKind::PriceChanged), 2);
        assert_eq!(bus.subscriber_count(EventKind::OrderCreated), 0);
    }
}
