//! Product catalog entity.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::ProductId;

/// A product from the catalog. The current price is what the pricing
/// service mutates; price-drop alerts compare it against the previous
/// value carried in the event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
}
