//! SMS notification delivery.
//!
//! [`SmsSender`] mirrors [`EmailSender`](super::EmailSender): a mock
//! transport with a recorded outbox and injectable rejections. SMS bodies
//! past the single-segment limit are delivered but logged, since carriers
//! split them into multiple segments.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use storefront_core::Channel;

use super::{ChannelSender, SendError, SentMessage};
use crate::templates::RenderedMessage;

/// Single SMS segment length.
const MAX_SMS_LENGTH: usize = 160;

/// Mock SMS transport with a recorded outbox.
pub struct SmsSender {
    outbox: Mutex<Vec<SentMessage>>,
    rejects: Mutex<HashSet<String>>,
}

impl SmsSender {
    pub fn new() -> Self {
        Self {
            outbox: Mutex::new(Vec::new()),
            rejects: Mutex::new(HashSet::new()),
        }
    }

    /// Make every future send to `number` fail.
    pub fn reject_address(&self, number: impl Into<String>) {
        self.rejects
            .lock()
            .expect("reject list poisoned")
            .insert(number.into());
    }

    /// Every message sent so far, oldest first.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.outbox.lock().expect("outbox poisoned").clone()
    }

    /// Number of messages sent so far.
    pub fn sent_count(&self) -> usize {
        self.outbox.lock().expect("outbox poisoned").len()
    }

    /// The first message sent to a specific number, if any.
    pub fn sent_to(&self, number: &str) -> Option<SentMessage> {
        self.outbox
            .lock()
            .expect("outbox poisoned")
            .iter()
            .find(|message| message.recipient == number)
            .cloned()
    }
}

impl Default for SmsSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelSender for SmsSender {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    async fn send(&self, address: &str, message: &RenderedMessage) -> Result<(), SendError> {
        if self
            .rejects
            .lock()
            .expect("reject list poisoned")
            .contains(address)
        {
            tracing::error!(to = address, "SMS delivery rejected");
            return Err(SendError::Rejected(address.to_string()));
        }

        if message.body.len() > MAX_SMS_LENGTH {
            tracing::warn!(
                to = address,
                length = message.body.len(),
                limit = MAX_SMS_LENGTH,
                "SMS body exceeds a single segment, carrier will split it"
            );
        }

        tracing::info!(to = address, body = %message.body, "Notification SMS sent");

        self.outbox.lock().expect("outbox poisoned").push(SentMessage {
            channel: Channel::Sms,
            recipient: address.to_string(),
            subject: None,
            body: message.body.clone(),
            sent_at: chrono::Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_records_body_without_subject() {
        let sender = SmsSender::new();
        let message = RenderedMessage {
            subject: Some("ignored for sms".to_string()),
            body: "Your order #ord-001 has shipped!".to_string(),
        };

        sender.send("+1-555-0101", &message).await.unwrap();

        let sent = sender.sent_to("+1-555-0101").unwrap();
        assert_eq!(sent.channel, Channel::Sms);
        assert!(sent.subject.is_none());
        assert_eq!(sent.body, "Your order #ord-001 has shipped!");
    }

    #[tokio::test]
    async fn oversized_body_is_still_delivered() {
        let sender = SmsSender::new();
        let message = RenderedMessage {
            subject: None,
            body: "x".repeat(MAX_SMS_LENGTH + 1),
        };

        sender.send("+1-555-0101", &message).await.unwrap();

        assert_eq!(sender.sent_count(), 1);
    }

    #[tokio::test]
    async fn rejected_number_fails_the_send() {
        let sender = SmsSender::new();
        sender.reject_address("+1-555-0199");

        let result = sender
            .send(
                "+1-555-0199",
                &RenderedMessage {
                    subject: None,
                    body: "hello".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(SendError::Rejected(_))));
    }
}
