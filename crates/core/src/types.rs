//! Identifier and timestamp aliases used across the workspace.

/// Customer identifiers, e.g. `"cust-001"`.
pub type CustomerId = String;

/// Order identifiers, e.g. `"ord-001"`.
pub type OrderId = String;

/// Product identifiers (SKUs), e.g. `"prod-001"`.
pub type ProductId = String;

/// Payment identifiers, e.g. `"pay-0001"`.
pub type PaymentId = String;

/// Promotion identifiers, e.g. `"promo-summer-sale"`.
pub type PromotionId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
