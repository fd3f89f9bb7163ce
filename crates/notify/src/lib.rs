//! Notification decision engine.
//!
//! The sole consumer of the storefront event bus. For every subscribed
//! event this crate decides *whether* and *how* to notify:
//!
//! - [`service::NotificationService`] — event handlers for the simple,
//!   compound, and correlated notification scenarios.
//! - [`eligibility`] — pure predicates gating who gets notified.
//! - [`templates`] — per-kind, per-channel message rendering.
//! - [`delivery`] — channel sender trait plus the email/SMS mock
//!   transports with inspectable outboxes.
//! - [`decision`] — decision and delivery-outcome value types.

pub mod decision;
pub mod delivery;
pub mod eligibility;
pub mod service;
pub mod templates;

pub use decision::{DeliveryRecord, DeliveryStatus, NotificationDecision};
pub use delivery::{ChannelSender, EmailSender, SendError, SentMessage, SmsSender};
pub use service::NotificationService;
pub use templates::{render, Notice, RenderedMessage};
