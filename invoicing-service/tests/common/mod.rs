//! Test helper module for invoicing-service integration tests.

#![allow(dead_code)]

use invoicing_service::config::{JwtSettings, Settings};
use invoicing_service::startup::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const SEED_EMAIL: &str = "aguayo@emb.com";
pub const SEED_PASSWORD: &str = "emb2025";

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    // Held so the data file outlives the server.
    data_dir: TempDir,
}

impl TestApp {
    /// Spawn a new test application on a random port with a fresh data file.
    pub async fn spawn() -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp dir");
        let data_file = data_dir
            .path()
            .join("billing.json")
            .to_string_lossy()
            .into_owned();

        let settings = Settings {
            host: "127.0.0.1".to_string(),
            port: 0,
            data_file,
            jwt: JwtSettings {
                secret: Secret::new("test_secret".to_string()),
                token_expiry_hours: 1,
            },
            log_level: "warn".to_string(),
            seed_password: Secret::new(SEED_PASSWORD.to_string()),
        };

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/api/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            data_dir,
        }
    }

    /// Log in as the seeded admin user and return a bearer token.
    pub async fn login(&self) -> String {
        let response = self
            .client
            .post(format!("{}/api/auth/login", self.address))
            .json(&json!({ "email": SEED_EMAIL, "password": SEED_PASSWORD }))
            .send()
            .await
            .expect("Failed to execute login request");
        assert_eq!(response.status(), 200, "Seeded login should succeed");

        let body: Value = response.json().await.expect("Login response is not JSON");
        body["token"]
            .as_str()
            .expect("Login response has no token")
            .to_string()
    }

    pub async fn get(&self, token: &str, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post(&self, token: &str, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put(&self, token: &str, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch(&self, token: &str, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, token: &str, path: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
