//! Domain models for the billing ledger.

pub mod coerce;

mod client;
mod invoice;
mod service;
mod user;

pub use client::{Client, ClientPayload};
pub use invoice::{
    EnrichedInvoice, EnrichedLineItem, Invoice, InvoicePayload, InvoiceStatus, InvoiceView,
    LineItem, LineItemInput,
};
pub use service::{Service, ServicePayload, default_iva_rate};
pub use user::{User, UserProfile};
