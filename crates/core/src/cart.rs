//! Shopping cart entities.
//!
//! Carts feed the price-drop alert scenario: when a price falls, every
//! customer with the product in their cart is a notification candidate.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{CustomerId, ProductId, Timestamp};

/// A single item in a customer's cart.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CartItem {
    pub product_id: ProductId,
    #[validate(range(min = 1))]
    pub quantity: u32,
    #[serde(default = "chrono::Utc::now")]
    pub added_at: Timestamp,
}

/// A customer's shopping cart. One cart per customer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Cart {
    pub customer_id: CustomerId,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<CartItem>,
    #[serde(default = "chrono::Utc::now")]
    pub updated_at: Timestamp,
}

impl Cart {
    /// Whether the cart contains the given product.
    pub fn contains_product(&self, product_id: &str) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    /// All product ids currently in the cart.
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.items.iter().map(|item| item.product_id.clone()).collect()
    }
}
