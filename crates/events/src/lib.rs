//! Storefront event bus and correlation infrastructure.
//!
//! This crate provides the event backbone the notification platform runs
//! on:
//!
//! - [`DomainEvent`] — the canonical immutable event envelope, with a
//!   closed [`EventPayload`] variant per event kind.
//! - [`EventBus`] — in-process typed publish/subscribe hub with
//!   registration-order delivery and per-handler failure isolation.
//! - [`EventCorrelator`] — stateful tracker that folds related events into
//!   at-most-once aggregate-completion signals.

pub mod bus;
pub mod correlator;
pub mod event;

pub use bus::{DispatchReport, EventBus, EventHandler, HandlerError, SubscriptionId};
pub use correlator::{AggregateCompletion, CorrelatorError, EventCorrelator};
pub use event::{DomainEvent, EventKind, EventPayload};
