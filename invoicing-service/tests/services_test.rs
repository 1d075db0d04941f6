//! Service catalog endpoint integration tests.

mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn catalog_is_seeded_on_first_boot() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let response = app.get(&token, "/api/services").await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Body is not JSON");
    let services = body["services"].as_array().expect("services is not an array");
    assert_eq!(services.len(), 5);
    assert_eq!(services[0]["name"], "Desarrollo Web");
    assert_eq!(services[0]["price"], json!(800.0));
}

#[tokio::test]
async fn service_create_coerces_string_price_and_defaults_vat() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let created = app
        .post(
            &token,
            "/api/services",
            &json!({ "name": "Consultoría", "price": "150.00" }),
        )
        .await;
    assert_eq!(created.status(), 201);

    let body: Value = created.json().await.expect("Body is not JSON");
    assert_eq!(body["message"], "Service created successfully");
    assert_eq!(body["service"]["price"], json!(150.0));
    assert_eq!(body["service"]["iva_rate"], json!(21.0));
}

#[tokio::test]
async fn service_without_a_numeric_price_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let missing = app
        .post(&token, "/api/services", &json!({ "name": "Consultoría" }))
        .await;
    assert_eq!(missing.status(), 400);

    let garbage = app
        .post(
            &token,
            "/api/services",
            &json!({ "name": "Consultoría", "price": "gratis" }),
        )
        .await;
    assert_eq!(garbage.status(), 400);
}

#[tokio::test]
async fn service_update_and_delete_work() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let updated = app
        .put(
            &token,
            "/api/services/4",
            &json!({ "name": "Hosting", "price": 60, "iva_rate": 10 }),
        )
        .await;
    assert_eq!(updated.status(), 200);

    let fetched = app.get(&token, "/api/services/4").await;
    let body: Value = fetched.json().await.expect("Body is not JSON");
    assert_eq!(body["service"]["price"], json!(60.0));
    assert_eq!(body["service"]["iva_rate"], json!(10.0));

    let deleted = app.delete(&token, "/api/services/4").await;
    assert_eq!(deleted.status(), 200);

    let gone = app.get(&token, "/api/services/4").await;
    assert_eq!(gone.status(), 404);
}
