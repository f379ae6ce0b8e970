use crate::dtos::ImportResponse;
use crate::error::AppError;
use crate::models::LineItem;
use crate::services::metrics::{ERRORS_TOTAL, IMPORTED_LINE_ITEMS_TOTAL};
use crate::services::spreadsheet;
use axum::{
    extract::Multipart,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::instrument;

const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Manual-entry validation for a single line item. Echoes the accepted item
/// back; rejections list every offending field.
#[instrument(skip(item), fields(awb_number = %item.awb_number))]
pub async fn validate_line_item(Json(item): Json<LineItem>) -> Result<impl IntoResponse, AppError> {
    let invalid = item.invalid_fields();
    if !invalid.is_empty() {
        ERRORS_TOTAL.with_label_values(&["validation_error"]).inc();
        return Err(AppError::InvalidLineItem(format!(
            "Please fill in all required fields: {}",
            invalid.join(", ")
        )));
    }

    Ok((StatusCode::OK, Json(item)))
}

/// Parse an uploaded spreadsheet into line items, preserving row order.
#[instrument(skip(multipart))]
pub async fn import_line_items(mut multipart: Multipart) -> Result<impl IntoResponse, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
        })?
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No file uploaded")))?;

    let filename = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    if !is_csv_upload(&filename, &content_type) {
        ERRORS_TOTAL.with_label_values(&["import_error"]).inc();
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Please upload a valid CSV file"
        )));
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e)))?;

    if data.len() > MAX_UPLOAD_BYTES {
        ERRORS_TOTAL.with_label_values(&["import_error"]).inc();
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "File too large (max 5MB)"
        )));
    }

    let line_items = spreadsheet::parse_line_items(&data).map_err(|e| {
        tracing::warn!(filename = %filename, error = %e, "Spreadsheet import failed");
        ERRORS_TOTAL.with_label_values(&["import_error"]).inc();
        e
    })?;

    IMPORTED_LINE_ITEMS_TOTAL.inc_by(line_items.len() as u64);
    tracing::info!(
        filename = %filename,
        count = line_items.len(),
        "Imported line items from spreadsheet"
    );

    Ok(Json(ImportResponse {
        count: line_items.len(),
        line_items,
    }))
}

/// Serve the sample spreadsheet download.
pub async fn download_sample() -> Result<impl IntoResponse, AppError> {
    let csv = spreadsheet::sample_csv()?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sample_invoice_line_items.csv\"".to_string(),
            ),
        ],
        csv,
    ))
}

fn is_csv_upload(filename: &str, content_type: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".csv") || content_type.contains("csv")
}
