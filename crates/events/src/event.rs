//! Domain event envelope and the closed set of event kinds.
//!
//! Events are immutable facts named in past tense. Each carries only the
//! fields its subscribers need, so handlers rarely have to query back to
//! the publishing domain. Adding a kind means adding an [`EventPayload`]
//! variant and its [`EventKind`] discriminant — the bus itself never
//! changes, and every `match` on the payload is checked exhaustively at
//! compile time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_core::status::{CustomerSegment, LineItemStatus, OrderStatus};
use storefront_core::types::{
    CustomerId, OrderId, PaymentId, ProductId, PromotionId, Timestamp,
};

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// An immutable record of something that happened on the platform.
///
/// Constructed via [`DomainEvent::new`]; ownership passes from the
/// publisher to the bus, and subscribers observe it by reference only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique id for this event instance.
    pub id: Uuid,

    /// When the event occurred (UTC).
    pub occurred_at: Timestamp,

    /// Which service published the event, e.g. `"ordering-service"`.
    pub source: String,

    /// The kind-specific payload.
    pub payload: EventPayload,
}

impl DomainEvent {
    /// Create a new event stamped with a fresh id and the current time.
    pub fn new(source: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: chrono::Utc::now(),
            source: source.into(),
            payload,
        }
    }

    /// The event's kind discriminant, used for subscription routing.
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

impl std::fmt::Display for DomainEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (id={}, source={})",
            self.kind(),
            &self.id.to_string()[..8],
            self.source
        )
    }
}

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Field-less discriminant for [`EventPayload`], used as the bus routing
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    OrderCreated,
    OrderStatusChanged,
    LineItemStatusChanged,
    PaymentAttempted,
    PaymentSucceeded,
    PaymentFailed,
    PriceChanged,
    PromotionActivated,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OrderCreated => "OrderCreated",
            Self::OrderStatusChanged => "OrderStatusChanged",
            Self::LineItemStatusChanged => "LineItemStatusChanged",
            Self::PaymentAttempted => "PaymentAttempted",
            Self::PaymentSucceeded => "PaymentSucceeded",
            Self::PaymentFailed => "PaymentFailed",
            Self::PriceChanged => "PriceChanged",
            Self::PromotionActivated => "PromotionActivated",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventPayload
// ---------------------------------------------------------------------------

/// The closed, tagged set of event payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum EventPayload {
    OrderCreated(OrderCreated),
    OrderStatusChanged(OrderStatusChanged),
    LineItemStatusChanged(LineItemStatusChanged),
    PaymentAttempted(PaymentAttempted),
    PaymentSucceeded(PaymentSucceeded),
    PaymentFailed(PaymentFailed),
    PriceChanged(PriceChanged),
    PromotionActivated(PromotionActivated),
}

impl EventPayload {
    /// The discriminant for this payload.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::OrderCreated(_) => EventKind::OrderCreated,
            Self::OrderStatusChanged(_) => EventKind::OrderStatusChanged,
            Self::LineItemStatusChanged(_) => EventKind::LineItemStatusChanged,
            Self::PaymentAttempted(_) => EventKind::PaymentAttempted,
            Self::PaymentSucceeded(_) => EventKind::PaymentSucceeded,
            Self::PaymentFailed(_) => EventKind::PaymentFailed,
            Self::PriceChanged(_) => EventKind::PriceChanged,
            Self::PromotionActivated(_) => EventKind::PromotionActivated,
        }
    }
}

/// A new order was placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub line_item_count: usize,
    pub total_amount: f64,
}

/// An order's overall status changed, e.g. PROCESSING -> SHIPPED.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub previous_status: OrderStatus,
    pub new_status: OrderStatus,
}

/// An individual line item's status changed.
///
/// `items_remaining` counts the order's items still short of a terminal
/// state after this change, so subscribers can log progress without a
/// lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemStatusChanged {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub previous_status: LineItemStatus,
    pub new_status: LineItemStatus,
    pub items_remaining: usize,
}

/// A payment attempt started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAttempted {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub amount: f64,
    pub attempt_number: u32,
}

/// A payment went through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSucceeded {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub amount: f64,
}

/// A payment attempt failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFailed {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub amount: f64,
    pub failure_reason: String,
    pub attempt_number: u32,
}

/// A product's catalog price changed.
///
/// Both prices travel with the event so subscribers can tell a drop from
/// an increase without querying the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChanged {
    pub product_id: ProductId,
    pub product_name: String,
    pub previous_price: f64,
    pub new_price: f64,
}

impl PriceChanged {
    /// True when the price went down.
    pub fn is_decrease(&self) -> bool {
        self.new_price < self.previous_price
    }

    /// Absolute saving versus the previous price.
    pub fn savings(&self) -> f64 {
        self.previous_price - self.new_price
    }
}

/// A promotion became active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionActivated {
    pub promotion_id: PromotionId,
    pub name: String,
    pub description: String,
    pub promo_code: Option<String>,
    pub eligible_segments: Vec<CustomerSegment>,
    pub end_date: String,
}
