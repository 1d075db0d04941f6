//! Invoicing service: REST API over the billing ledger.

use std::sync::Arc;

use billing_core::Ledger;

use crate::services::JwtService;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod services;
pub mod startup;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub jwt: Arc<JwtService>,
}
