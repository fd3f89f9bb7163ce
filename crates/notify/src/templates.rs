//! Notification message rendering.
//!
//! [`render`] turns a typed [`Notice`] into channel-appropriate content:
//! email gets a subject line and a long-form body, SMS gets a short body
//! that fits a carrier segment where possible. Rendering is pure — all
//! context travels in the `Notice` variant.

use storefront_core::{Channel, NotificationCategory};

// ---------------------------------------------------------------------------
// Rendered output
// ---------------------------------------------------------------------------

/// Channel-ready message content.
#[derive(Debug, Clone)]
pub struct RenderedMessage {
    /// Present for email, `None` for SMS.
    pub subject: Option<String>,
    pub body: String,
}

/// One order line for the item-list block in order emails.
#[derive(Debug, Clone)]
pub struct ItemSummary {
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Render order lines as an indented block, one item per line.
pub fn format_item_list(items: &[ItemSummary]) -> String {
    items
        .iter()
        .map(|item| format!("  - {} x{} (${:.2})", item.name, item.quantity, item.unit_price))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// The closed set of renderable notifications, each carrying its context.
#[derive(Debug, Clone)]
pub enum Notice {
    OrderShipped {
        customer_name: String,
        order_id: String,
        item_list: String,
    },
    OrderDelivered {
        customer_name: String,
        order_id: String,
    },
    OrderComplete {
        customer_name: String,
        order_id: String,
        item_list: String,
        item_count: usize,
    },
    PaymentFailed {
        customer_name: String,
        order_id: String,
        amount: f64,
        failure_reason: String,
    },
    PriceDropAlert {
        customer_name: String,
        product_name: String,
        previous_price: f64,
        new_price: f64,
    },
    PromotionAvailable {
        customer_name: String,
        name: String,
        description: String,
        promo_code: Option<String>,
        end_date: String,
    },
}

impl Notice {
    /// The preference category this notice falls under.
    pub fn category(&self) -> NotificationCategory {
        match self {
            Self::OrderShipped { .. } | Self::OrderDelivered { .. } | Self::OrderComplete { .. } => {
                NotificationCategory::OrderUpdates
            }
            Self::PaymentFailed { .. } => NotificationCategory::PaymentAlerts,
            Self::PriceDropAlert { .. } => NotificationCategory::PriceAlerts,
            Self::PromotionAvailable { .. } => NotificationCategory::Promotions,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a notice for a channel.
pub fn render(notice: &Notice, channel: Channel) -> RenderedMessage {
    match channel {
        Channel::Email => render_email(notice),
        Channel::Sms => render_sms(notice),
    }
}

fn render_email(notice: &Notice) -> RenderedMessage {
    let (subject, body) = match notice {
        Notice::OrderShipped {
            customer_name,
            order_id,
            item_list,
        } => (
            format!("Your Order Has Shipped! - #{order_id}"),
            format!(
                "Hi {customer_name},\n\n\
                 Great news! Your order #{order_id} has shipped and is on its way.\n\n\
                 Shipped Items:\n{item_list}\n\n\
                 You can track your package using the carrier's tracking system.\n\n\
                 Thanks for shopping with us!\n"
            ),
        ),
        Notice::OrderDelivered {
            customer_name,
            order_id,
        } => (
            format!("Your Order Has Been Delivered - #{order_id}"),
            format!(
                "Hi {customer_name},\n\n\
                 Your order #{order_id} has been delivered!\n\n\
                 We hope you love your purchase. If you have any questions or concerns, \
                 please don't hesitate to contact us.\n\n\
                 Thanks for shopping with us!\n"
            ),
        ),
        Notice::OrderComplete {
            customer_name,
            order_id,
            item_list,
            ..
        } => (
            format!("All Items From Your Order Have Shipped! - #{order_id}"),
            format!(
                "Hi {customer_name},\n\n\
                 All items from your order #{order_id} have now shipped!\n\n\
                 Complete Order Contents:\n{item_list}\n\n\
                 All items are on their way to you. Thanks for your patience with items \
                 that shipped separately.\n\n\
                 Thanks for shopping with us!\n"
            ),
        ),
        Notice::PaymentFailed {
            customer_name,
            order_id,
            amount,
            failure_reason,
        } => (
            format!("Payment Issue - Action Required for Order #{order_id}"),
            format!(
                "Hi {customer_name},\n\n\
                 We were unable to process your payment of ${amount:.2} for order #{order_id}.\n\n\
                 Reason: {failure_reason}\n\n\
                 Please update your payment method or try again to avoid delays with your order.\n\n\
                 If you need assistance, our support team is here to help.\n"
            ),
        ),
        Notice::PriceDropAlert {
            customer_name,
            product_name,
            previous_price,
            new_price,
        } => {
            let savings = previous_price - new_price;
            let discount_percent = savings / previous_price * 100.0;
            (
                format!("Price Drop Alert: {product_name} is now ${new_price:.2}!"),
                format!(
                    "Hi {customer_name},\n\n\
                     Great news! An item in your cart just dropped in price.\n\n\
                     {product_name}\n\
                     Was: ${previous_price:.2}\n\
                     Now: ${new_price:.2}\n\
                     You save: ${savings:.2} ({discount_percent:.0}% off)\n\n\
                     Don't miss out - prices can change at any time!\n\n\
                     Complete your purchase now to lock in this lower price.\n"
                ),
            )
        }
        Notice::PromotionAvailable {
            customer_name,
            name,
            description,
            promo_code,
            end_date,
        } => {
            let code_line = match promo_code {
                Some(code) => format!("Use code: {code}\n\n"),
                None => String::new(),
            };
            (
                format!("Special Offer: {name}"),
                format!(
                    "Hi {customer_name},\n\n\
                     You're eligible for a special promotion!\n\n\
                     {name}\n\
                     {description}\n\n\
                     Valid until: {end_date}\n\n\
                     {code_line}\
                     Don't miss out on these savings!\n"
                ),
            )
        }
    };

    RenderedMessage {
        subject: Some(subject),
        body,
    }
}

fn render_sms(notice: &Notice) -> RenderedMessage {
    let body = match notice {
        Notice::OrderShipped { order_id, .. } => {
            format!("Your order #{order_id} has shipped! Track your package for delivery updates.")
        }
        Notice::OrderDelivered { order_id, .. } => {
            format!("Order #{order_id} delivered! Thanks for shopping with us.")
        }
        Notice::OrderComplete {
            order_id,
            item_count,
            ..
        } => format!(
            "All {item_count} items from order #{order_id} have shipped! \
             Your complete order is on the way."
        ),
        Notice::PaymentFailed {
            order_id, amount, ..
        } => format!(
            "Payment of ${amount:.2} failed for order #{order_id}. \
             Please update your payment method."
        ),
        Notice::PriceDropAlert {
            product_name,
            previous_price,
            new_price,
            ..
        } => {
            let savings = previous_price - new_price;
            format!(
                "{product_name} in your cart dropped from ${previous_price:.2} to \
                 ${new_price:.2}! Save ${savings:.2} now."
            )
        }
        Notice::PromotionAvailable {
            name,
            promo_code,
            end_date,
            ..
        } => match promo_code {
            Some(code) => format!("Special offer: {name}! Use code {code}. Valid until {end_date}."),
            None => format!("Special offer: {name}! Valid until {end_date}."),
        },
    };

    RenderedMessage {
        subject: None,
        body,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_shipped_email_carries_order_id_and_items() {
        let notice = Notice::OrderShipped {
            customer_name: "Alice Johnson".to_string(),
            order_id: "ord-001".to_string(),
            item_list: format_item_list(&[ItemSummary {
                name: "Wireless Router X500".to_string(),
                quantity: 1,
                unit_price: 149.99,
            }]),
        };

        let message = render(&notice, Channel::Email);

        let subject = message.subject.unwrap();
        assert!(subject.contains("ord-001"));
        assert!(subject.to_lowercase().contains("shipped"));
        assert!(message.body.contains("Hi Alice Johnson"));
        assert!(message.body.contains("Wireless Router X500 x1 ($149.99)"));
    }

    #[test]
    fn sms_rendering_has_no_subject_and_fits_a_segment() {
        let notice = Notice::OrderShipped {
            customer_name: "Alice Johnson".to_string(),
            order_id: "ord-001".to_string(),
            item_list: String::new(),
        };

        let message = render(&notice, Channel::Sms);

        assert!(message.subject.is_none());
        assert!(message.body.len() <= 160);
        assert!(message.body.contains("ord-001"));
    }

    #[test]
    fn price_drop_email_computes_savings_and_discount() {
        let notice = Notice::PriceDropAlert {
            customer_name: "Carol Williams".to_string(),
            product_name: "Wireless Router X500".to_string(),
            previous_price: 149.99,
            new_price: 119.99,
        };

        let message = render(&notice, Channel::Email);

        assert!(message.subject.unwrap().contains("119.99"));
        assert!(message.body.contains("Was: $149.99"));
        assert!(message.body.contains("Now: $119.99"));
        assert!(message.body.contains("You save: $30.00 (20% off)"));
    }

    #[test]
    fn payment_failed_rendering_includes_the_reason() {
        let notice = Notice::PaymentFailed {
            customer_name: "Alice Johnson".to_string(),
            order_id: "ord-001".to_string(),
            amount: 309.97,
            failure_reason: "card_declined".to_string(),
        };

        let email = render(&notice, Channel::Email);
        assert!(email.body.contains("card_declined"));
        assert!(email.body.contains("$309.97"));

        let sms = render(&notice, Channel::Sms);
        assert!(sms.body.contains("$309.97"));
    }

    #[test]
    fn promotion_without_code_omits_the_code_line() {
        let notice = Notice::PromotionAvailable {
            customer_name: "Carol Williams".to_string(),
            name: "Summer Sale".to_string(),
            description: "20% off all networking equipment".to_string(),
            promo_code: None,
            end_date: "2026-08-31".to_string(),
        };

        let email = render(&notice, Channel::Email);
        assert!(!email.body.contains("Use code"));

        let sms = render(&notice, Channel::Sms);
        assert!(!sms.body.contains("Use code"));
    }

    #[test]
    fn notice_category_routes_to_the_right_preference_bucket() {
        let shipped = Notice::OrderDelivered {
            customer_name: "A".to_string(),
            order_id: "ord-001".to_string(),
        };
        assert_eq!(shipped.category(), NotificationCategory::OrderUpdates);

        let promo = Notice::PromotionAvailable {
            customer_name: "A".to_string(),
            name: "Sale".to_string(),
            description: "d".to_string(),
            promo_code: None,
            end_date: "2026-01-01".to_string(),
        };
        assert_eq!(promo.category(), NotificationCategory::Promotions);
    }
}
