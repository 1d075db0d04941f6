//! Client model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A billed client. Optional contact fields default to empty strings so old
/// snapshot records missing them still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub cif_nif: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or replacing a client. Updates are full-field
/// replacements of everything but the identifier and creation timestamp.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub cif_nif: String,
}
