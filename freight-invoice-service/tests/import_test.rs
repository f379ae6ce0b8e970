//! Spreadsheet import tests.

mod common;

use common::TestApp;
use reqwest::multipart;

const HEADER: &str =
    "Shipped Date,Awb Number,Origin,Destination,Shipment Type,Act Weight,Vol Weight,Freight Charges,Other Charges,Total";

async fn upload(app: &TestApp, filename: &str, mime: &str, data: Vec<u8>) -> reqwest::Response {
    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(mime)
            .unwrap(),
    );

    app.client
        .post(format!("{}/line-items/import", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn import_preserves_row_order_and_field_mapping() {
    let app = TestApp::spawn().await;

    let csv = format!(
        "{}\n{}\n{}\n{}\n",
        HEADER,
        "2024-02-01,AWB111,Mumbai,Delhi,Prepaid,25.5,22.3,1650,500,2500",
        "2024-02-02,AWB222,Bengaluru,Chennai,COD,18.7,17.9,1120,350,1800",
        "2024-02-03,AWB333,Hyderabad,Kolkata,,32.1,30.5,2050,750,3200",
    );

    let response = upload(&app, "shipments.csv", "text/csv", csv.into_bytes()).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["count"], 3);

    let items = body["line_items"].as_array().expect("Missing line_items");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["awb_number"], "AWB111");
    assert_eq!(items[1]["awb_number"], "AWB222");
    assert_eq!(items[2]["awb_number"], "AWB333");

    assert_eq!(items[0]["origin"], "Mumbai");
    assert_eq!(items[0]["shipment_type"], "prepaid");
    assert_eq!(items[0]["act_weight"], "25.5");
    assert_eq!(items[1]["shipment_type"], "cod");
    // Blank shipment type maps to unset
    assert_eq!(items[2]["shipment_type"], "unset");
    assert_eq!(items[2]["total"], "3200");
}

#[tokio::test]
async fn unparseable_numeric_cells_default_to_zero() {
    let app = TestApp::spawn().await;

    let csv = format!(
        "{}\n{}\n",
        HEADER, "2024-02-01,AWB111,Mumbai,Delhi,Prepaid,not-a-number,22.3,,500,2500",
    );

    let response = upload(&app, "shipments.csv", "text/csv", csv.into_bytes()).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let items = body["line_items"].as_array().expect("Missing line_items");
    assert_eq!(items[0]["act_weight"], "0");
    assert_eq!(items[0]["freight_charges"], "0");
    assert_eq!(items[0]["other_charges"], "500");
}

#[tokio::test]
async fn missing_columns_default_to_empty_values() {
    let app = TestApp::spawn().await;

    // No Origin or Destination columns at all.
    let csv = "Shipped Date,Awb Number,Total\n2024-02-01,AWB111,2500\n".to_string();

    let response = upload(&app, "shipments.csv", "text/csv", csv.into_bytes()).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let items = body["line_items"].as_array().expect("Missing line_items");
    assert_eq!(items[0]["origin"], "");
    assert_eq!(items[0]["destination"], "");
    assert_eq!(items[0]["total"], "2500");
}

#[tokio::test]
async fn non_csv_upload_is_rejected() {
    let app = TestApp::spawn().await;

    let response = upload(
        &app,
        "shipments.xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        vec![0x50, 0x4b, 0x03, 0x04],
    )
    .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn malformed_file_is_rejected_without_partial_result() {
    let app = TestApp::spawn().await;

    // Invalid UTF-8 in a record aborts the whole import.
    let mut data = format!("{}\n", HEADER).into_bytes();
    data.extend_from_slice(&[0xff, 0xfe, 0xfd]);
    data.extend_from_slice(b",AWB111,Mumbai,Delhi,Prepaid,1,1,1,1,1\n");

    let response = upload(&app, "shipments.csv", "text/csv", data).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn sample_spreadsheet_roundtrips_through_import() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/line-items/sample", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(disposition.contains("sample_invoice_line_items.csv"));

    let sample = response.bytes().await.expect("Failed to read body").to_vec();
    let text = String::from_utf8(sample.clone()).expect("Sample is not UTF-8");
    assert!(text.starts_with("Shipped Date,"));

    let response = upload(&app, "sample_invoice_line_items.csv", "text/csv", sample).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["count"], 2);
    let items = body["line_items"].as_array().expect("Missing line_items");
    assert_eq!(items[0]["awb_number"], "AWB123456789");
    assert_eq!(items[1]["awb_number"], "AWB987654321");
}
