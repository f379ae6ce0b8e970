mod health;
mod invoices;
mod line_items;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use invoices::generate_invoice;
pub use line_items::{download_sample, import_line_items, validate_line_item};
