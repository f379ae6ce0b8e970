//! Shipment line item model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the shipment was charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentType {
    Prepaid,
    Cod,
    Unset,
}

impl ShipmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentType::Prepaid => "prepaid",
            ShipmentType::Cod => "cod",
            ShipmentType::Unset => "unset",
        }
    }

    /// Lenient parse used by spreadsheet import: anything unrecognized maps
    /// to `Unset`.
    pub fn from_string(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "prepaid" => ShipmentType::Prepaid,
            "cod" => ShipmentType::Cod,
            _ => ShipmentType::Unset,
        }
    }

    /// Label printed in the line-item table.
    pub fn label(&self) -> &'static str {
        match self {
            ShipmentType::Prepaid => "Prepaid",
            ShipmentType::Cod => "COD",
            ShipmentType::Unset => "-",
        }
    }
}

impl Default for ShipmentType {
    fn default() -> Self {
        ShipmentType::Unset
    }
}

/// A single shipment billed on the invoice. Immutable once accepted onto the
/// line-item list; ordering is entry order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub shipped_date: String,
    pub awb_number: String,
    pub origin: String,
    pub destination: String,
    pub shipment_type: ShipmentType,
    pub act_weight: Decimal,
    pub vol_weight: Decimal,
    pub freight_charges: Decimal,
    pub other_charges: Decimal,
    pub total: Decimal,
}

impl LineItem {
    /// Manual-entry validation: text fields must be non-empty, weights and
    /// total strictly positive, charges zero or greater. Returns the failing
    /// fields in declaration order. Spreadsheet-imported rows bypass this
    /// (unparseable cells are coerced to zero instead).
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.shipped_date.trim().is_empty() {
            fields.push("shipped date");
        }
        if self.awb_number.trim().is_empty() {
            fields.push("awb number");
        }
        if self.origin.trim().is_empty() {
            fields.push("origin");
        }
        if self.destination.trim().is_empty() {
            fields.push("destination");
        }
        if self.act_weight <= Decimal::ZERO {
            fields.push("act weight");
        }
        if self.vol_weight <= Decimal::ZERO {
            fields.push("vol weight");
        }
        if self.freight_charges < Decimal::ZERO {
            fields.push("freight charges");
        }
        if self.other_charges < Decimal::ZERO {
            fields.push("other charges");
        }
        if self.total <= Decimal::ZERO {
            fields.push("total");
        }
        fields
    }
}
