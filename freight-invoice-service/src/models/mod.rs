//! Domain models for the freight invoice service.

mod address;
mod invoice;
mod line_item;

pub use address::Address;
pub use invoice::{InvoiceData, InvoiceDetails, InvoiceTotals};
pub use line_item::{LineItem, ShipmentType};
