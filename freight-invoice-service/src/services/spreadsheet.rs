//! Spreadsheet (CSV) import and sample generation for line items.
//!
//! Import maps the fixed header names below onto [`LineItem`] fields. Cells
//! are coerced, not validated: a missing or unparseable numeric cell becomes
//! zero and a missing text cell becomes the empty string, so a sheet exported
//! from another system imports without manual cleanup. Row order is preserved
//! as line-item order.

use crate::error::AppError;
use crate::models::{LineItem, ShipmentType};
use anyhow::anyhow;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Expected header row, in column order.
pub const COLUMNS: [&str; 10] = [
    "Shipped Date",
    "Awb Number",
    "Origin",
    "Destination",
    "Shipment Type",
    "Act Weight",
    "Vol Weight",
    "Freight Charges",
    "Other Charges",
    "Total",
];

/// Parse an uploaded CSV file into line items, preserving row order.
///
/// Any unreadable row aborts the whole import; no partial result is returned.
pub fn parse_line_items(data: &[u8]) -> Result<Vec<LineItem>, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| AppError::SpreadsheetError(anyhow!("Could not read the header row: {}", e)))?
        .clone();
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_string(), idx))
        .collect();

    let mut line_items = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        // Row numbers are 1-based and skip the header.
        let record = record.map_err(|e| {
            AppError::SpreadsheetError(anyhow!("Row {}: {}", row_idx + 2, e))
        })?;
        line_items.push(line_item_from_record(&columns, &record));
    }

    Ok(line_items)
}

fn line_item_from_record(columns: &HashMap<String, usize>, record: &StringRecord) -> LineItem {
    LineItem {
        shipped_date: text_cell(columns, record, "Shipped Date"),
        awb_number: text_cell(columns, record, "Awb Number"),
        origin: text_cell(columns, record, "Origin"),
        destination: text_cell(columns, record, "Destination"),
        shipment_type: ShipmentType::from_string(cell(columns, record, "Shipment Type")),
        act_weight: decimal_cell(columns, record, "Act Weight"),
        vol_weight: decimal_cell(columns, record, "Vol Weight"),
        freight_charges: decimal_cell(columns, record, "Freight Charges"),
        other_charges: decimal_cell(columns, record, "Other Charges"),
        total: decimal_cell(columns, record, "Total"),
    }
}

fn cell<'a>(columns: &HashMap<String, usize>, record: &'a StringRecord, name: &str) -> &'a str {
    columns
        .get(name)
        .and_then(|&idx| record.get(idx))
        .unwrap_or("")
}

fn text_cell(columns: &HashMap<String, usize>, record: &StringRecord, name: &str) -> String {
    cell(columns, record, name).trim().to_string()
}

fn decimal_cell(columns: &HashMap<String, usize>, record: &StringRecord, name: &str) -> Decimal {
    cell(columns, record, name)
        .trim()
        .parse()
        .unwrap_or(Decimal::ZERO)
}

/// Build the downloadable sample spreadsheet: the expected header row plus
/// two example rows.
pub fn sample_csv() -> Result<Vec<u8>, AppError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(COLUMNS)
        .map_err(|e| AppError::InternalError(anyhow!("Failed to write CSV header: {}", e)))?;
    let rows = [
        [
            "2024-02-01",
            "AWB123456789",
            "Mumbai",
            "Delhi",
            "Prepaid",
            "25.5",
            "22.3",
            "1650",
            "500",
            "2500",
        ],
        [
            "2024-02-02",
            "AWB987654321",
            "Bengaluru",
            "Chennai",
            "COD",
            "18.7",
            "17.9",
            "1120",
            "350",
            "1800",
        ],
    ];
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| AppError::InternalError(anyhow!("Failed to write CSV row: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::InternalError(anyhow!("Failed to flush CSV: {}", e)))
}
