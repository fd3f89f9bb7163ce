//! Customer entity — the recipient of notifications.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::status::CustomerSegment;
use crate::types::{CustomerId, Timestamp};

/// A customer record, including the contact details notifications are
/// addressed to and the loyalty segment eligibility rules consult.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: String,
    #[serde(default = "default_segment")]
    pub segment: CustomerSegment,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: Timestamp,
}

fn default_segment() -> CustomerSegment {
    CustomerSegment::Bronze
}
