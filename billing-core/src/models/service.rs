//! Service catalog model.

use super::coerce::{RawNumber, lenient_decimal};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub fn default_iva_rate() -> Decimal {
    Decimal::from(21)
}

/// A billable service in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(default = "default_iva_rate", deserialize_with = "lenient_iva")]
    pub iva_rate: Decimal,
    pub created_at: DateTime<Utc>,
}

// Seeded records predate the iva_rate field; absent or junk means the
// business default.
fn lenient_iva<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(lenient_decimal(deserializer)?.unwrap_or_else(default_iva_rate))
}

/// Input for creating or replacing a catalog service. The price arrives
/// string-or-number typed from the client and is coerced at the repository
/// boundary; a missing or non-numeric price is a validation error.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServicePayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: RawNumber,
    #[serde(default)]
    pub iva_rate: RawNumber,
}
