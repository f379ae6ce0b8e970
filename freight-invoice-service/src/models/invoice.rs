//! Invoice aggregate and totals computation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Address, LineItem};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Invoice metadata block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InvoiceDetails {
    #[validate(length(min = 1, message = "invoice number is required"))]
    pub invoice_number: String,
    #[validate(length(min = 1, message = "invoice date is required"))]
    pub invoice_date: String,
    #[validate(length(min = 1, message = "due date is required"))]
    pub due_date: String,
}

impl InvoiceDetails {
    /// Parse both dates and enforce that the due date is on or after the
    /// invoice date.
    pub fn parsed_dates(&self) -> Result<(NaiveDate, NaiveDate), String> {
        let invoice_date = NaiveDate::parse_from_str(&self.invoice_date, DATE_FORMAT)
            .map_err(|_| format!("Invalid invoice date: {}", self.invoice_date))?;
        let due_date = NaiveDate::parse_from_str(&self.due_date, DATE_FORMAT)
            .map_err(|_| format!("Invalid due date: {}", self.due_date))?;
        if due_date < invoice_date {
            return Err("Due date must be on or after the invoice date".to_string());
        }
        Ok((invoice_date, due_date))
    }
}

/// Full invoice payload: the sole input to PDF rendering. Reconstructed fresh
/// on every request, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceData {
    pub bill_to: Address,
    pub ship_to: Address,
    pub line_items: Vec<LineItem>,
    pub fuel_surcharge: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub invoice_details: InvoiceDetails,
}

/// Computed totals for an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub fuel_surcharge_amount: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub grand_total: Decimal,
}

impl InvoiceTotals {
    /// Percentage amounts are computed from the exact subtotal, not from
    /// intermediate rounded values; rounding happens only at display time.
    pub fn compute(
        line_items: &[LineItem],
        fuel_surcharge: Decimal,
        cgst: Decimal,
        sgst: Decimal,
    ) -> Self {
        let subtotal: Decimal = line_items.iter().map(|item| item.total).sum();
        let fuel_surcharge_amount = subtotal * fuel_surcharge / Decimal::ONE_HUNDRED;
        let cgst_amount = subtotal * cgst / Decimal::ONE_HUNDRED;
        let sgst_amount = subtotal * sgst / Decimal::ONE_HUNDRED;
        let grand_total = subtotal + fuel_surcharge_amount + cgst_amount + sgst_amount;

        InvoiceTotals {
            subtotal,
            fuel_surcharge_amount,
            cgst_amount,
            sgst_amount,
            grand_total,
        }
    }
}
