//! Billing ledger core.
//!
//! Data-access and computation layer for the invoicing backend: the money
//! arithmetic, the whole-document JSON snapshot store, the repositories
//! over its four collections, and the dashboard aggregator. The HTTP
//! surface lives in the `invoicing-service` crate.

pub mod dashboard;
pub mod error;
pub mod ledger;
pub mod models;
pub mod money;
pub mod store;

pub use error::AppError;
pub use ledger::Ledger;
pub use store::{JsonStore, Snapshot};
