//! Invoice and line item models.

use super::coerce::{RawId, RawNumber, lenient_date, lenient_decimal, lenient_id};
use super::service::default_iva_rate;
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
        InvoiceStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    /// Strict parse; unknown values are rejected at the API boundary.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            "overdue" => Some(InvoiceStatus::Overdue),
            "cancelled" => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }

    /// Lossy parse for stored records; an unknown status degrades to
    /// pending instead of poisoning the whole snapshot.
    pub fn from_string(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for InvoiceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => InvoiceStatus::from_string(&s),
            _ => InvoiceStatus::default(),
        })
    }
}

/// One service/quantity/price/VAT tuple embedded within an invoice.
///
/// The numeric fields are stored leniently: snapshots written by older
/// versions of the app hold numeric strings and nulls in these positions,
/// and summation defines defaults for all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient_id")]
    pub service_id: u64,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub unit_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub iva_rate: Option<Decimal>,
}

/// Invoice document. `total` is never stored; it is always derived from the
/// line items at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: u64,
    pub invoice_number: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub client_id: u64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub issue_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
}

/// Raw line item input from the HTTP boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineItemInput {
    #[serde(default)]
    pub service_id: RawId,
    #[serde(default)]
    pub quantity: RawNumber,
    #[serde(default)]
    pub unit_price: RawNumber,
    #[serde(default)]
    pub iva_rate: RawNumber,
}

impl LineItemInput {
    /// Creation-time normalization: quantity defaults to 1 (whole number),
    /// unit price to 0 and the VAT rate to the 21% business default. A null
    /// VAT rate means "use the default", not 0; the 0 fallback belongs to
    /// summation, not creation.
    pub fn normalize(&self) -> Result<LineItem, AppError> {
        let service_id = self.service_id.get().ok_or_else(|| {
            AppError::BadRequest("line item service_id must be a positive integer".to_string())
        })?;

        Ok(LineItem {
            service_id,
            quantity: Some(self.quantity.int_or(Decimal::ONE)),
            unit_price: Some(self.unit_price.decimal_or(Decimal::ZERO)),
            iva_rate: Some(self.iva_rate.decimal_or(default_iva_rate())),
        })
    }
}

/// Raw invoice input from the HTTP boundary. Used for both creation and
/// merge-updates; on update, omitted fields leave the stored record alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoicePayload {
    /// `None` when the field is absent; `Some` with an empty [`RawId`] when
    /// a value was provided but does not coerce to an id.
    #[serde(default)]
    pub client_id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub issue_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<LineItemInput>>,
}

/// Invoice with joined display fields for lists and detail responses.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedInvoice {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub client_name: String,
    pub total: Decimal,
}

/// Line item with joined service display fields.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedLineItem {
    #[serde(flatten)]
    pub item: LineItem,
    pub service_name: String,
    pub service_description: String,
}

/// Fully enriched invoice: client contact fields plus per-item service
/// details. This is the payload the PDF renderer and the detail modal
/// consume.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceView {
    pub id: u64,
    pub invoice_number: String,
    pub client_id: u64,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_address: String,
    pub items: Vec<EnrichedLineItem>,
    pub total: Decimal,
}
