//! Postal address model shared by the bill-to and ship-to blocks.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Business address. All fields except `address_line2` and `gstin` are
/// required when the address is used on an invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Address {
    #[validate(length(min = 1, message = "business name is required"))]
    pub business_name: String,
    #[validate(length(min = 1, message = "address line 1 is required"))]
    pub address_line1: String,
    pub address_line2: Option<String>,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "state is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "pincode is required"))]
    pub pincode: String,
    pub gstin: Option<String>,
}

impl Address {
    /// City/state/pincode line as printed on the invoice.
    pub fn city_line(&self) -> String {
        format!("{}, {} {}", self.city, self.state, self.pincode)
    }
}
