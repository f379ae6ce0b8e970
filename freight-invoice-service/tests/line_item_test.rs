//! Manual line-item entry validation tests.

mod common;

use common::TestApp;
use serde_json::json;

fn valid_item() -> serde_json::Value {
    json!({
        "shipped_date": "2024-02-01",
        "awb_number": "AWB123456789",
        "origin": "Mumbai",
        "destination": "Delhi",
        "shipment_type": "prepaid",
        "act_weight": 25.5,
        "vol_weight": 22.3,
        "freight_charges": 1650,
        "other_charges": 500,
        "total": 2500
    })
}

async fn validate(app: &TestApp, body: serde_json::Value) -> reqwest::Response {
    app.client
        .post(format!("{}/line-items/validate", app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn valid_line_item_is_accepted() {
    let app = TestApp::spawn().await;

    let response = validate(&app, valid_item()).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["awb_number"], "AWB123456789");
    assert_eq!(body["shipment_type"], "prepaid");
}

#[tokio::test]
async fn zero_weight_is_rejected() {
    let app = TestApp::spawn().await;

    let mut item = valid_item();
    item["act_weight"] = json!(0);
    let response = validate(&app, item).await;
    assert_eq!(response.status(), 422);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let error = body["error"].as_str().unwrap_or_default().to_string();
    assert!(error.contains("act weight"), "unexpected error: {}", error);
}

#[tokio::test]
async fn negative_total_is_rejected() {
    let app = TestApp::spawn().await;

    let mut item = valid_item();
    item["total"] = json!(-10);
    let response = validate(&app, item).await;
    assert_eq!(response.status(), 422);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let error = body["error"].as_str().unwrap_or_default().to_string();
    assert!(error.contains("total"), "unexpected error: {}", error);
}

#[tokio::test]
async fn zero_other_charges_is_accepted() {
    let app = TestApp::spawn().await;

    let mut item = valid_item();
    item["other_charges"] = json!(0);
    let response = validate(&app, item).await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn empty_awb_number_is_rejected() {
    let app = TestApp::spawn().await;

    let mut item = valid_item();
    item["awb_number"] = json!("");
    let response = validate(&app, item).await;
    assert_eq!(response.status(), 422);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let error = body["error"].as_str().unwrap_or_default().to_string();
    assert!(error.contains("awb number"), "unexpected error: {}", error);
}

#[tokio::test]
async fn every_missing_field_is_reported() {
    let app = TestApp::spawn().await;

    let response = validate(&app, json!({})).await;
    assert_eq!(response.status(), 422);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let error = body["error"].as_str().unwrap_or_default().to_string();
    for field in ["shipped date", "awb number", "origin", "destination", "total"] {
        assert!(error.contains(field), "missing {} in: {}", field, error);
    }
}
