pub mod metrics;
pub mod pdf;
pub mod spreadsheet;

pub use metrics::{get_metrics, init_metrics};
