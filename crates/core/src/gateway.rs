//! Read-only data access consumed by the notification service.
//!
//! The notification core never owns customer, catalog, order, or cart
//! data; it queries them through this narrow trait. All methods return
//! owned values, and a missing entity is `None` (the caller decides
//! whether that is an error or merely "not eligible").

use crate::cart::Cart;
use crate::catalog::Product;
use crate::customer::Customer;
use crate::order::Order;
use crate::preferences::NotificationPreferences;
use crate::status::CustomerSegment;

/// Read-only lookups against the customer/catalog/order/cart data owners.
pub trait DataGateway: Send + Sync {
    /// Customer by id.
    fn customer(&self, id: &str) -> Option<Customer>;

    /// Product by id.
    fn product(&self, id: &str) -> Option<Product>;

    /// Order by id.
    fn order(&self, id: &str) -> Option<Order>;

    /// Every cart currently containing the given product.
    fn carts_containing_product(&self, product_id: &str) -> Vec<Cart>;

    /// Notification preferences for a customer, if they have a record.
    fn notification_preferences(&self, customer_id: &str) -> Option<NotificationPreferences>;

    /// All customers in the given loyalty segment.
    fn customers_in_segment(&self, segment: CustomerSegment) -> Vec<Customer>;
}
