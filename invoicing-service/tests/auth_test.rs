//! Authentication integration tests.

mod common;

use common::{TestApp, SEED_EMAIL, SEED_PASSWORD};
use serde_json::{json, Value};

#[tokio::test]
async fn login_returns_token_and_sanitized_user() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "email": SEED_EMAIL, "password": SEED_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Body is not JSON");
    assert!(!body["token"].as_str().unwrap_or_default().is_empty());
    assert_eq!(body["user"]["email"], SEED_EMAIL);
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "email": SEED_EMAIL, "password": "nope" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn login_with_unknown_email_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "email": "ghost@emb.com", "password": SEED_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn login_with_missing_fields_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "email": SEED_EMAIL }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn profile_returns_the_token_owner() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let response = app.get(&token, "/api/auth/profile").await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Body is not JSON");
    assert_eq!(body["user"]["id"], 1);
    assert_eq!(body["user"]["name"], "Aguayo");
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_tokens() {
    let app = TestApp::spawn().await;

    let bare = app
        .client
        .get(format!("{}/api/clients", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(bare.status(), 401);

    let garbage = app.get("not.a.token", "/api/clients").await;
    assert_eq!(garbage.status(), 401);
}

#[tokio::test]
async fn users_listing_is_sorted_by_name() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let response = app.get(&token, "/api/auth/users").await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Body is not JSON");
    let names: Vec<&str> = body["users"]
        .as_array()
        .expect("users is not an array")
        .iter()
        .map(|u| u["name"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["Aguayo", "Alex", "Andrés", "Pepe"]);
}
