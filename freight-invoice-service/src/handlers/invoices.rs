use crate::error::AppError;
use crate::models::{InvoiceData, InvoiceTotals};
use crate::services::metrics::{ERRORS_TOTAL, INVOICES_RENDERED_TOTAL, INVOICE_AMOUNT_TOTAL};
use crate::services::pdf;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::instrument;
use validator::Validate;

/// Validate the full invoice payload, compute totals and render the PDF.
#[instrument(
    skip(state, payload),
    fields(
        invoice_number = %payload.invoice_details.invoice_number,
        line_items = payload.line_items.len()
    )
)]
pub async fn generate_invoice(
    State(state): State<AppState>,
    Json(payload): Json<InvoiceData>,
) -> Result<impl IntoResponse, AppError> {
    validate_invoice(&payload).map_err(|e| {
        ERRORS_TOTAL.with_label_values(&["validation_error"]).inc();
        e
    })?;

    let totals = InvoiceTotals::compute(
        &payload.line_items,
        payload.fuel_surcharge,
        payload.cgst,
        payload.sgst,
    );

    let rendered = pdf::render_invoice(
        &state.config,
        state.logo.as_deref().map(|bytes| bytes.as_slice()),
        &payload,
        &totals,
    )
    .map_err(|e| {
        tracing::error!(
            invoice_number = %payload.invoice_details.invoice_number,
            error = %e,
            "Failed to render invoice PDF"
        );
        INVOICES_RENDERED_TOTAL.with_label_values(&["error"]).inc();
        ERRORS_TOTAL.with_label_values(&["render_error"]).inc();
        e
    })?;

    INVOICES_RENDERED_TOTAL.with_label_values(&["ok"]).inc();
    INVOICE_AMOUNT_TOTAL
        .with_label_values(&["INR"])
        .inc_by(totals.grand_total.to_f64().unwrap_or(0.0));

    tracing::info!(
        invoice_number = %payload.invoice_details.invoice_number,
        grand_total = %totals.grand_total,
        size = rendered.bytes.len(),
        "Invoice PDF generated"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", rendered.filename),
            ),
        ],
        rendered.bytes,
    ))
}

/// Whole-invoice validation, reported per logical group: invoice details,
/// address fields, line-item list, tax percentages. Imported line items are
/// not re-validated here.
fn validate_invoice(invoice: &InvoiceData) -> Result<(), AppError> {
    if invoice.invoice_details.validate().is_err() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Please fill in all invoice details: invoice number, invoice date and due date are required"
        )));
    }
    invoice
        .invoice_details
        .parsed_dates()
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e)))?;

    if let Err(errors) = invoice.bill_to.validate() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Missing required billing address fields: {}",
            field_list(&errors)
        )));
    }
    if let Err(errors) = invoice.ship_to.validate() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Missing required shipping address fields: {}",
            field_list(&errors)
        )));
    }

    if invoice.line_items.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "At least one line item is required"
        )));
    }

    if invoice.fuel_surcharge < Decimal::ZERO
        || invoice.cgst < Decimal::ZERO
        || invoice.sgst < Decimal::ZERO
    {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Tax percentages must be zero or greater"
        )));
    }

    Ok(())
}

fn field_list(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort_unstable();
    fields.join(", ")
}
