//! Delivery channel senders.
//!
//! The notification service hands each decision to a [`ChannelSender`];
//! real transports (SMTP, SMS gateways) live behind this boundary. The
//! senders shipped here — [`email::EmailSender`] and [`sms::SmsSender`] —
//! log every send and record it in an inspectable outbox, which is what
//! the demo and the test suites assert against.

pub mod email;
pub mod sms;

use async_trait::async_trait;

use storefront_core::types::Timestamp;
use storefront_core::Channel;

use crate::templates::RenderedMessage;

pub use email::EmailSender;
pub use sms::SmsSender;

/// Error type for channel send failures.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The transport refused the recipient address.
    #[error("Recipient address rejected: {0}")]
    Rejected(String),
}

/// A message a sender accepted, kept for inspection.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub channel: Channel,
    pub recipient: String,
    /// Present for email, absent for SMS.
    pub subject: Option<String>,
    pub body: String,
    pub sent_at: Timestamp,
}

/// One outbound transport, e.g. email or SMS.
///
/// Senders own retry policy and transport details; the notification core
/// only selects the channel and hands over rendered content.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Which channel this sender serves.
    fn channel(&self) -> Channel;

    /// Deliver a rendered message to an address.
    async fn send(&self, address: &str, message: &RenderedMessage) -> Result<(), SendError>;
}
