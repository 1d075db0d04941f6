//! Application startup and lifecycle management.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use billing_core::models::{default_iva_rate, Service, User};
use billing_core::{AppError, JsonStore, Ledger};
use chrono::Utc;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::handlers;
use crate::services::{password, JwtService};
use crate::AppState;

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given settings. Creates and seeds the
    /// data file on first boot.
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let store = JsonStore::new(&settings.data_file);
        store.ensure_data_file().await?;
        store
            .seed(
                seed_users(settings.seed_password.expose_secret())?,
                seed_services(),
            )
            .await?;

        let state = AppState {
            ledger: Arc::new(Ledger::new(store)),
            jwt: Arc::new(JwtService::new(&settings.jwt)),
        };

        let host: std::net::IpAddr = settings
            .host
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid host: {}", e)))?;
        let addr = SocketAddr::from((host, settings.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, data_file = %settings.data_file, "Listener bound");

        Ok(Self {
            port,
            listener,
            router: api_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );
        axum::serve(self.listener, self.router).await
    }
}

fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::app::health_check))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/profile", get(handlers::auth::profile))
        .route("/api/auth/users", get(handlers::auth::list_users))
        .route("/api/clients", get(handlers::clients::list_clients))
        .route("/api/clients", post(handlers::clients::create_client))
        .route("/api/clients/:id", get(handlers::clients::get_client))
        .route("/api/clients/:id", put(handlers::clients::update_client))
        .route("/api/clients/:id", delete(handlers::clients::delete_client))
        .route("/api/services", get(handlers::services::list_services))
        .route("/api/services", post(handlers::services::create_service))
        .route("/api/services/:id", get(handlers::services::get_service))
        .route("/api/services/:id", put(handlers::services::update_service))
        .route("/api/services/:id", delete(handlers::services::delete_service))
        .route("/api/invoices", get(handlers::invoices::list_invoices))
        .route("/api/invoices", post(handlers::invoices::create_invoice))
        .route("/api/invoices/:id", get(handlers::invoices::get_invoice))
        .route("/api/invoices/:id", put(handlers::invoices::update_invoice))
        .route("/api/invoices/:id", delete(handlers::invoices::delete_invoice))
        .route("/api/invoices/:id/view", get(handlers::invoices::view_invoice))
        .route(
            "/api/invoices/:id/status",
            patch(handlers::invoices::update_invoice_status),
        )
        .route("/api/dashboard", get(handlers::dashboard::overview))
        .route(
            "/api/dashboard/client-stats",
            get(handlers::dashboard::client_stats),
        )
        .route(
            "/api/dashboard/service-stats",
            get(handlers::dashboard::service_stats),
        )
        .route(
            "/api/dashboard/revenue-by-period",
            get(handlers::dashboard::revenue_by_period),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn seed_users(seed_password: &str) -> Result<Vec<User>, AppError> {
    let hash = password::hash_password(seed_password)?;
    let user = |id: u64, name: &str, email: &str, role: &str| User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password_hash: hash.clone(),
        role: role.to_string(),
    };

    Ok(vec![
        user(1, "Aguayo", "aguayo@emb.com", "admin"),
        user(2, "Pepe", "pepe@emb.com", "user"),
        user(3, "Andrés", "andres@emb.com", "user"),
        user(4, "Alex", "alex@emb.com", "user"),
    ])
}

fn seed_services() -> Vec<Service> {
    let service = |id: u64, name: &str, description: &str, price: u64| Service {
        id,
        name: name.to_string(),
        description: description.to_string(),
        price: Some(Decimal::from(price)),
        iva_rate: default_iva_rate(),
        created_at: Utc::now(),
    };

    vec![
        service(1, "Desarrollo Web", "Desarrollo de sitios web personalizados", 800),
        service(2, "Marketing Digital", "Estrategias de marketing online", 500),
        service(3, "Posicionamiento SEO", "Optimización para motores de búsqueda", 300),
        service(4, "Hosting", "Alojamiento web profesional", 50),
        service(5, "Mantenimiento", "Mantenimiento y actualizaciones", 100),
    ]
}
