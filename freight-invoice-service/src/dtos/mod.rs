use crate::models::LineItem;
use serde::Serialize;

/// Response body for a spreadsheet import.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub count: usize,
    pub line_items: Vec<LineItem>,
}
