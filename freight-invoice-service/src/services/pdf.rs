//! Invoice PDF rendering.
//!
//! Absolute-coordinate layout on A4 pages with the builtin Helvetica fonts.
//! The fixed header (title, logo, company block, invoice metadata, address
//! blocks) is placed on the first page; the line-item table, totals and terms
//! flow through a cursor that starts a new page whenever the remaining
//! vertical space is insufficient for the next row or line. Footers and page
//! numbers are stamped onto every page once the page count is known.

use crate::config::{CompanyConfig, ServiceConfig};
use crate::error::AppError;
use crate::models::{Address, InvoiceData, InvoiceTotals};
use anyhow::anyhow;
use chrono::NaiveDate;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Point,
};
use rust_decimal::Decimal;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_RIGHT: f32 = 15.0;
/// Content never descends below this; the band underneath holds the footer.
const FOOTER_LIMIT: f32 = 22.0;
const TOP_START: f32 = PAGE_HEIGHT_MM - 15.0;

const LOGO_WIDTH_MM: f32 = 40.0;
const ROW_HEIGHT: f32 = 6.0;
const LINE_HEIGHT: f32 = 5.0;

/// Line-item table: column label, x position, clip length for text cells.
const TABLE_COLUMNS: [(&str, f32, usize); 10] = [
    ("Date", 15.0, 10),
    ("AWB No.", 34.0, 13),
    ("Origin", 58.0, 11),
    ("Destination", 79.0, 11),
    ("Type", 100.0, 7),
    ("Act. Wt", 113.0, 9),
    ("Vol. Wt", 127.0, 9),
    ("Freight", 141.0, 10),
    ("Other", 157.0, 10),
    ("Amount", 173.0, 12),
];

/// A finished PDF and the download filename derived from the invoice number.
pub struct RenderedInvoice {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Render the invoice document. `logo` carries the raw bytes of the
/// configured logo image, if one was loaded at startup.
pub fn render_invoice(
    config: &ServiceConfig,
    logo: Option<&[u8]>,
    invoice: &InvoiceData,
    totals: &InvoiceTotals,
) -> Result<RenderedInvoice, AppError> {
    let mut layout = Layout::new("Tax Invoice")?;

    let body_start = render_header(&layout, config, logo, invoice);
    layout.y = body_start;

    render_table(&mut layout, invoice);
    render_totals(&mut layout, invoice, totals);
    render_terms(&mut layout, &config.terms);

    let bytes = layout.finish(&config.branding.footer_note)?;
    let filename = format!(
        "Invoice-{}.pdf",
        sanitize_filename(&invoice.invoice_details.invoice_number)
    );

    Ok(RenderedInvoice { filename, bytes })
}

/// Fixed first-page header. Returns the y position where flowing content
/// begins.
fn render_header(
    layout: &Layout,
    config: &ServiceConfig,
    logo: Option<&[u8]>,
    invoice: &InvoiceData,
) -> f32 {
    let title = "TAX INVOICE";
    layout.text_at(title, 20.0, centered_x(title, 20.0), TOP_START, true);

    if let Some(bytes) = logo {
        // Logo failures are never fatal; the invoice renders without it.
        if let Err(e) = add_logo(&layout.layer, bytes) {
            tracing::warn!(error = %e, "Skipping logo image");
        }
    }

    // Company block, top right.
    let mut y = TOP_START - 10.0;
    let company = &config.company;
    layout.text_at(&company.name, 10.0, 105.0, y, false);
    y -= LINE_HEIGHT;
    for line in company_lines(company) {
        layout.text_at(&line, 9.0, 105.0, y, false);
        y -= LINE_HEIGHT;
    }

    // Invoice metadata, left, below the logo area.
    let details = &invoice.invoice_details;
    let mut meta_y = 222.0;
    let meta = [
        format!("Invoice No: {}", details.invoice_number),
        format!("Invoice Date: {}", display_date(&details.invoice_date)),
        format!("Due Date: {}", display_date(&details.due_date)),
    ];
    for line in &meta {
        layout.text_at(line, 9.0, MARGIN_LEFT, meta_y, false);
        meta_y -= LINE_HEIGHT;
    }

    // Bill-to / ship-to blocks, side by side.
    let block_top = meta_y - LINE_HEIGHT;
    layout.text_at("Bill To:", 10.0, MARGIN_LEFT, block_top, true);
    layout.text_at("Ship To:", 10.0, 105.0, block_top, true);

    let bill_lines = address_lines(&invoice.bill_to);
    let ship_lines = address_lines(&invoice.ship_to);
    let mut y = block_top - LINE_HEIGHT;
    for line in &bill_lines {
        layout.text_at(line, 9.0, MARGIN_LEFT, y, false);
        y -= LINE_HEIGHT;
    }
    let mut y = block_top - LINE_HEIGHT;
    for line in &ship_lines {
        layout.text_at(line, 9.0, 105.0, y, false);
        y -= LINE_HEIGHT;
    }

    let block_depth = bill_lines.len().max(ship_lines.len()) as f32 * LINE_HEIGHT;
    block_top - LINE_HEIGHT - block_depth - 8.0
}

fn company_lines(company: &CompanyConfig) -> Vec<String> {
    let mut lines = vec![
        company.registration_id.clone(),
        company.address_line1.clone(),
        company.address_line2.clone(),
        company.city_line.clone(),
        company.country.clone(),
    ];
    if !company.gstin.is_empty() {
        lines.push(format!("GSTIN: {}", company.gstin));
    }
    if !company.phone.is_empty() {
        lines.push(format!("Phone: {}", company.phone));
    }
    if !company.email.is_empty() {
        lines.push(format!("Email: {}", company.email));
    }
    if !company.website.is_empty() {
        lines.push(format!("Web: {}", company.website));
    }
    lines.retain(|line| !line.trim().is_empty());
    lines
}

fn address_lines(address: &Address) -> Vec<String> {
    let mut lines = vec![address.business_name.clone(), address.address_line1.clone()];
    if let Some(line2) = &address.address_line2 {
        if !line2.trim().is_empty() {
            lines.push(line2.clone());
        }
    }
    lines.push(address.city_line());
    if let Some(gstin) = &address.gstin {
        if !gstin.trim().is_empty() {
            lines.push(format!("GSTIN: {}", gstin));
        }
    }
    lines
}

fn render_table(layout: &mut Layout, invoice: &InvoiceData) {
    draw_table_header(layout);

    for item in &invoice.line_items {
        if layout.ensure_space(ROW_HEIGHT) {
            draw_table_header(layout);
        }
        let cells = [
            clip(&item.shipped_date, TABLE_COLUMNS[0].2),
            clip(&item.awb_number, TABLE_COLUMNS[1].2),
            clip(&item.origin, TABLE_COLUMNS[2].2),
            clip(&item.destination, TABLE_COLUMNS[3].2),
            item.shipment_type.label().to_string(),
            format_amount(&item.act_weight),
            format_amount(&item.vol_weight),
            format_amount(&item.freight_charges),
            format_amount(&item.other_charges),
            format_amount(&item.total),
        ];
        for (cell, (_, x, _)) in cells.iter().zip(TABLE_COLUMNS.iter()) {
            layout.text_at(cell, 8.0, *x, layout.y, false);
        }
        layout.y -= ROW_HEIGHT;
    }

    // Closing rule sits just below the last row.
    layout.rule_at(layout.y + ROW_HEIGHT - 2.0);
    layout.y -= 2.0;
}

fn draw_table_header(layout: &mut Layout) {
    layout.ensure_space(ROW_HEIGHT + 4.0);
    for (label, x, _) in TABLE_COLUMNS.iter() {
        layout.text_at(label, 8.0, *x, layout.y, true);
    }
    layout.y -= 2.5;
    layout.rule_at(layout.y);
    layout.y -= 4.5;
}

fn render_totals(layout: &mut Layout, invoice: &InvoiceData, totals: &InvoiceTotals) {
    let rows = [
        ("Subtotal:".to_string(), &totals.subtotal, true),
        (
            format!("Fuel Surcharge ({}%):", format_rate(&invoice.fuel_surcharge)),
            &totals.fuel_surcharge_amount,
            false,
        ),
        (
            format!("CGST ({}%):", format_rate(&invoice.cgst)),
            &totals.cgst_amount,
            false,
        ),
        (
            format!("SGST ({}%):", format_rate(&invoice.sgst)),
            &totals.sgst_amount,
            false,
        ),
        ("Grand Total:".to_string(), &totals.grand_total, true),
    ];

    layout.y -= 2.0;
    for (label, amount, bold) in rows {
        layout.ensure_space(ROW_HEIGHT);
        layout.text_at(&label, 9.0, 128.0, layout.y, bold);
        layout.text_at(&format_amount(amount), 9.0, 173.0, layout.y, bold);
        layout.y -= ROW_HEIGHT;
    }
}

fn render_terms(layout: &mut Layout, terms: &[String]) {
    layout.ensure_space(12.0);
    layout.y -= 4.0;
    layout.text_at("Terms & Conditions:", 9.0, MARGIN_LEFT, layout.y, true);
    layout.y -= ROW_HEIGHT;

    for term in terms {
        layout.ensure_space(LINE_HEIGHT);
        layout.text_at(term, 8.0, MARGIN_LEFT, layout.y, false);
        layout.y -= LINE_HEIGHT;
    }
}

/// Cursor over a growing set of A4 pages.
struct Layout {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    y: f32,
}

impl Layout {
    fn new(title: &str) -> Result<Self, AppError> {
        let (doc, page, layer_idx) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer_idx);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::RenderError(anyhow!("Failed to load font: {}", e)))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::RenderError(anyhow!("Failed to load font: {}", e)))?;

        Ok(Layout {
            doc,
            pages: vec![(page, layer_idx)],
            layer,
            font,
            font_bold,
            y: TOP_START,
        })
    }

    fn text_at(&self, text: &str, font_size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        self.layer.use_text(text, font_size, Mm(x), Mm(y), font);
    }

    fn rule_at(&self, y: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_LEFT), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_RIGHT), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    /// Start a new page if fewer than `needed` millimetres remain above the
    /// footer band. Returns true when a page break happened.
    fn ensure_space(&mut self, needed: f32) -> bool {
        if self.y - needed < FOOTER_LIMIT {
            let (page, layer_idx) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer_idx);
            self.pages.push((page, layer_idx));
            self.y = TOP_START;
            return true;
        }
        false
    }

    /// Stamp the footer on every page and serialize the document.
    fn finish(self, footer_note: &str) -> Result<Vec<u8>, AppError> {
        let total_pages = self.pages.len();
        for (idx, (page, layer_idx)) in self.pages.iter().enumerate() {
            let layer = self.doc.get_page(*page).get_layer(*layer_idx);
            layer.use_text(
                footer_note,
                8.0,
                Mm(centered_x(footer_note, 8.0)),
                Mm(12.0),
                &self.font,
            );
            let page_label = format!("Page {} of {}", idx + 1, total_pages);
            layer.use_text(
                &page_label,
                8.0,
                Mm(PAGE_WIDTH_MM - MARGIN_RIGHT - approx_text_width_mm(&page_label, 8.0)),
                Mm(12.0),
                &self.font,
            );
        }

        let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
        self.doc
            .save(&mut writer)
            .map_err(|e| AppError::RenderError(anyhow!("Failed to serialize PDF: {}", e)))?;
        writer
            .into_inner()
            .map_err(|e| AppError::RenderError(anyhow!("Failed to flush PDF buffer: {}", e)))
    }
}

fn add_logo(layer: &PdfLayerReference, data: &[u8]) -> Result<(), anyhow::Error> {
    use printpdf::image_crate::codecs::jpeg::JpegDecoder;
    use printpdf::image_crate::codecs::png::PngDecoder;
    use printpdf::{Image, ImageTransform};

    let image = if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        Image::try_from(PngDecoder::new(std::io::Cursor::new(data))?)?
    } else {
        Image::try_from(JpegDecoder::new(std::io::Cursor::new(data))?)?
    };

    // Pick a dpi that maps the pixel width onto LOGO_WIDTH_MM on the page.
    let width_px = image.image.width.0.max(1) as f32;
    let dpi = width_px * 25.4 / LOGO_WIDTH_MM;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_LEFT)),
            translate_y: Some(Mm(254.0)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    Ok(())
}

/// Two decimal places, thousands groups separated by a space: `1234.5` →
/// `"1 234.50"`.
pub fn format_amount(value: &Decimal) -> String {
    let rounded = value.round_dp(2);
    let raw = rounded.to_string();
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, dec_part) = match unsigned.split_once('.') {
        Some((int_part, dec_part)) => (int_part, format!("{:0<2}", dec_part)),
        None => (unsigned, "00".to_string()),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, digit) in digits.iter().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*digit);
    }

    format!("{}{}.{}", sign, grouped, dec_part)
}

/// Tax rate for row labels, with trailing zeros trimmed.
pub fn format_rate(rate: &Decimal) -> String {
    let s = rate.to_string();
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Dates arrive as `YYYY-MM-DD`; the document prints them as `DD/MM/YYYY`.
fn display_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn sanitize_filename(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' || ch == ' ';
        out.push(if ok { ch } else { '_' });
    }
    let trimmed = out.trim().to_string();
    if trimmed.is_empty() {
        "invoice".to_string()
    } else {
        trimmed
    }
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('.');
        out
    }
}

// Average Helvetica advance per glyph; good enough to center short labels.
fn approx_text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5 * 0.3528
}

fn centered_x(text: &str, font_size: f32) -> f32 {
    (PAGE_WIDTH_MM - approx_text_width_mm(text, font_size)) / 2.0
}
