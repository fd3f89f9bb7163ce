//! Shared domain types for the storefront notification platform.
//!
//! This crate holds the vocabulary every other crate speaks:
//!
//! - [`types`] — identifier and timestamp aliases.
//! - [`status`] — order, line-item, payment, and segment enums.
//! - [`customer`], [`catalog`], [`order`], [`cart`], [`payment`] — domain
//!   models.
//! - [`preferences`] — per-customer notification preference records.
//! - [`channels`] — delivery channel and notification category enums.
//! - [`gateway`] — the read-only data-access trait consumed by the
//!   notification service.
//! - [`error`] — the shared [`CoreError`](error::CoreError) type.

pub mod cart;
pub mod catalog;
pub mod channels;
pub mod customer;
pub mod error;
pub mod gateway;
pub mod order;
pub mod payment;
pub mod preferences;
pub mod status;
pub mod types;

pub use cart::{Cart, CartItem};
pub use catalog::Product;
pub use channels::{Channel, NotificationCategory};
pub use customer::Customer;
pub use error::CoreError;
pub use gateway::DataGateway;
pub use order::{LineItem, Order};
pub use payment::Payment;
pub use preferences::{ChannelToggles, NotificationPreferences};
pub use status::{CustomerSegment, LineItemStatus, OrderStatus, PaymentStatus};
