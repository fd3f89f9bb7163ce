//! Per-customer notification preferences.
//!
//! A preference record maps each [`NotificationCategory`] to per-channel
//! opt-in flags. The notification service treats these as read-only input;
//! ownership of the data sits with the customer-data collaborator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::channels::{Channel, NotificationCategory};
use crate::types::CustomerId;

/// Per-channel opt-in flags for one notification category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChannelToggles {
    #[serde(default)]
    pub email: bool,
    #[serde(default)]
    pub sms: bool,
}

impl ChannelToggles {
    pub fn new(email: bool, sms: bool) -> Self {
        Self { email, sms }
    }

    /// Whether the given channel is enabled.
    pub fn allows(&self, channel: Channel) -> bool {
        match channel {
            Channel::Email => self.email,
            Channel::Sms => self.sms,
        }
    }
}

/// A customer's notification preference record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub customer_id: CustomerId,
    #[serde(default)]
    pub preferences: HashMap<NotificationCategory, ChannelToggles>,
}

impl NotificationPreferences {
    /// The default preference matrix applied when a customer has never
    /// edited their settings: order and payment notices on both channels,
    /// price alerts and promotions by email only.
    pub fn default_for(customer_id: impl Into<CustomerId>) -> Self {
        let preferences = HashMap::from([
            (
                NotificationCategory::OrderUpdates,
                ChannelToggles::new(true, true),
            ),
            (
                NotificationCategory::PriceAlerts,
                ChannelToggles::new(true, false),
            ),
            (
                NotificationCategory::Promotions,
                ChannelToggles::new(true, false),
            ),
            (
                NotificationCategory::PaymentAlerts,
                ChannelToggles::new(true, true),
            ),
        ]);
        Self {
            customer_id: customer_id.into(),
            preferences,
        }
    }

    /// The channels the customer has enabled for a category, email first.
    ///
    /// A category missing from the record means the customer receives
    /// nothing for it.
    pub fn channels_for(&self, category: NotificationCategory) -> Vec<Channel> {
        let Some(toggles) = self.preferences.get(&category) else {
            return Vec::new();
        };
        let mut channels = Vec::new();
        if toggles.email {
            channels.push(Channel::Email);
        }
        if toggles.sms {
            channels.push(Channel::Sms);
        }
        channels
    }

    /// Whether the customer wants this category on this channel.
    pub fn wants(&self, category: NotificationCategory, channel: Channel) -> bool {
        self.preferences
            .get(&category)
            .is_some_and(|toggles| toggles.allows(channel))
    }
}
