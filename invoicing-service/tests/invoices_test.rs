//! Invoice endpoint integration tests.

mod common;

use chrono::{Datelike, Utc};
use common::TestApp;
use serde_json::{json, Value};

async fn create_client(app: &TestApp, token: &str, name: &str) -> u64 {
    let response = app
        .post(token, "/api/clients", &json!({ "name": name }))
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Body is not JSON");
    body["client"]["id"].as_u64().expect("client has no id")
}

#[tokio::test]
async fn invoice_create_assigns_number_and_normalizes_items() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let client_id = create_client(&app, &token, "Acme").await;

    let created = app
        .post(
            &token,
            "/api/invoices",
            &json!({
                "client_id": client_id.to_string(),
                "issue_date": "2025-06-01",
                "items": [
                    { "service_id": "1", "quantity": "2", "unit_price": "100" },
                ]
            }),
        )
        .await;
    assert_eq!(created.status(), 201);

    let body: Value = created.json().await.expect("Body is not JSON");
    let invoice = &body["invoice"];
    let year = Utc::now().year();
    assert_eq!(invoice["invoice_number"], format!("EMB-{}-000001", year));
    assert_eq!(invoice["client_id"], json!(client_id));
    assert_eq!(invoice["status"], "pending");
    // Absent VAT falls back to the business default at creation time.
    assert_eq!(invoice["items"][0]["iva_rate"], json!(21.0));
}

#[tokio::test]
async fn invoice_listing_is_enriched_with_client_and_total() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let client_id = create_client(&app, &token, "Acme").await;

    let created = app
        .post(
            &token,
            "/api/invoices",
            &json!({
                "client_id": client_id,
                "items": [
                    { "service_id": 1, "quantity": 2, "unit_price": 100, "iva_rate": 21 },
                ]
            }),
        )
        .await;
    assert_eq!(created.status(), 201);

    let listed = app.get(&token, "/api/invoices").await;
    assert_eq!(listed.status(), 200);
    let body: Value = listed.json().await.expect("Body is not JSON");
    let invoices = body["invoices"].as_array().expect("invoices is not an array");
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0]["client_name"], "Acme");
    assert_eq!(invoices[0]["total"], json!(242.0));
}

#[tokio::test]
async fn invoice_view_joins_service_details() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let client_id = create_client(&app, &token, "Acme").await;

    let created = app
        .post(
            &token,
            "/api/invoices",
            &json!({
                "client_id": client_id,
                "items": [
                    { "service_id": 1, "quantity": 1, "unit_price": 800, "iva_rate": 21 },
                    { "service_id": 999, "quantity": 1, "unit_price": 10, "iva_rate": 0 },
                ]
            }),
        )
        .await;
    let body: Value = created.json().await.expect("Body is not JSON");
    let id = body["invoice"]["id"].as_u64().expect("invoice has no id");

    let viewed = app.get(&token, &format!("/api/invoices/{}/view", id)).await;
    assert_eq!(viewed.status(), 200);
    let body: Value = viewed.json().await.expect("Body is not JSON");
    let items = body["invoice"]["items"].as_array().expect("no items");
    assert_eq!(items[0]["service_name"], "Desarrollo Web");
    assert_eq!(items[1]["service_name"], "Servicio desconocido");
    assert_eq!(body["invoice"]["total"], json!(978.0));
}

#[tokio::test]
async fn invoice_without_client_id_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let response = app
        .post(&token, "/api/invoices", &json!({ "items": [] }))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn status_transitions_are_validated() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let client_id = create_client(&app, &token, "Acme").await;

    let created = app
        .post(&token, "/api/invoices", &json!({ "client_id": client_id }))
        .await;
    let body: Value = created.json().await.expect("Body is not JSON");
    let id = body["invoice"]["id"].as_u64().expect("invoice has no id");

    let rejected = app
        .patch(
            &token,
            &format!("/api/invoices/{}/status", id),
            &json!({ "status": "archived" }),
        )
        .await;
    assert_eq!(rejected.status(), 400);

    let accepted = app
        .patch(
            &token,
            &format!("/api/invoices/{}/status", id),
            &json!({ "status": "paid" }),
        )
        .await;
    assert_eq!(accepted.status(), 200);

    let fetched = app.get(&token, &format!("/api/invoices/{}", id)).await;
    let body: Value = fetched.json().await.expect("Body is not JSON");
    assert_eq!(body["invoice"]["status"], "paid");

    let missing = app
        .patch(
            &token,
            "/api/invoices/999/status",
            &json!({ "status": "paid" }),
        )
        .await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn invoice_update_merges_only_provided_fields() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let client_id = create_client(&app, &token, "Acme").await;

    let created = app
        .post(
            &token,
            "/api/invoices",
            &json!({
                "client_id": client_id,
                "notes": "Entrega en almacén",
                "items": [
                    { "service_id": 1, "quantity": 2, "unit_price": 100, "iva_rate": 21 },
                ]
            }),
        )
        .await;
    let body: Value = created.json().await.expect("Body is not JSON");
    let id = body["invoice"]["id"].as_u64().expect("invoice has no id");

    let updated = app
        .put(
            &token,
            &format!("/api/invoices/{}", id),
            &json!({ "status": "overdue" }),
        )
        .await;
    assert_eq!(updated.status(), 200);

    let fetched = app.get(&token, &format!("/api/invoices/{}", id)).await;
    let body: Value = fetched.json().await.expect("Body is not JSON");
    assert_eq!(body["invoice"]["status"], "overdue");
    assert_eq!(body["invoice"]["notes"], "Entrega en almacén");
    assert_eq!(body["invoice"]["total"], json!(242.0));
}

#[tokio::test]
async fn invoice_delete_removes_the_record() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let client_id = create_client(&app, &token, "Acme").await;

    let created = app
        .post(&token, "/api/invoices", &json!({ "client_id": client_id }))
        .await;
    let body: Value = created.json().await.expect("Body is not JSON");
    let id = body["invoice"]["id"].as_u64().expect("invoice has no id");

    let deleted = app.delete(&token, &format!("/api/invoices/{}", id)).await;
    assert_eq!(deleted.status(), 200);

    let gone = app.get(&token, &format!("/api/invoices/{}", id)).await;
    assert_eq!(gone.status(), 404);
}
