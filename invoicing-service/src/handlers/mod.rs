//! HTTP handlers for the invoicing API.

pub mod app;
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod invoices;
pub mod services;
