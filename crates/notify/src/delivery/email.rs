//! Email notification delivery.
//!
//! [`EmailSender`] stands in for an SMTP integration: sends are logged and
//! recorded rather than handed to a relay. Specific addresses can be made
//! to fail via [`EmailSender::reject_address`] so failure paths are
//! exercisable in tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use storefront_core::Channel;

use super::{ChannelSender, SendError, SentMessage};
use crate::templates::RenderedMessage;

/// Default sender address stamped on outgoing mail.
const DEFAULT_FROM_ADDRESS: &str = "noreply@storefront.local";

/// Mock email transport with a recorded outbox.
pub struct EmailSender {
    from_address: String,
    outbox: Mutex<Vec<SentMessage>>,
    rejects: Mutex<HashSet<String>>,
}

impl EmailSender {
    pub fn new() -> Self {
        Self::with_from_address(DEFAULT_FROM_ADDRESS)
    }

    /// Use a specific "From" address instead of the default.
    pub fn with_from_address(from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
            outbox: Mutex::new(Vec::new()),
            rejects: Mutex::new(HashSet::new()),
        }
    }

    /// Make every future send to `address` fail.
    pub fn reject_address(&self, address: impl Into<String>) {
        self.rejects
            .lock()
            .expect("reject list poisoned")
            .insert(address.into());
    }

    /// Every message sent so far, oldest first.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.outbox.lock().expect("outbox poisoned").clone()
    }

    /// Number of messages sent so far.
    pub fn sent_count(&self) -> usize {
        self.outbox.lock().expect("outbox poisoned").len()
    }

    /// The first message sent to a specific recipient, if any.
    pub fn sent_to(&self, recipient: &str) -> Option<SentMessage> {
        self.outbox
            .lock()
            .expect("outbox poisoned")
            .iter()
            .find(|message| message.recipient == recipient)
            .cloned()
    }
}

impl Default for EmailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelSender for EmailSender {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, address: &str, message: &RenderedMessage) -> Result<(), SendError> {
        if self
            .rejects
            .lock()
            .expect("reject list poisoned")
            .contains(address)
        {
            tracing::error!(to = address, "Email delivery rejected");
            return Err(SendError::Rejected(address.to_string()));
        }

        let subject = message.subject.clone().unwrap_or_else(|| "(no subject)".to_string());
        tracing::info!(
            to = address,
            from = %self.from_address,
            subject = %subject,
            "Notification email sent"
        );

        self.outbox.lock().expect("outbox poisoned").push(SentMessage {
            channel: Channel::Email,
            recipient: address.to_string(),
            subject: Some(subject),
            body: message.body.clone(),
            sent_at: chrono::Utc::now(),
        });
        Ok(())
    }
}
