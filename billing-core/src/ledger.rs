//! Repository facade over the snapshot store.
//!
//! All reads operate on one immutable snapshot fully loaded into memory;
//! all mutations are read-modify-write cycles under the store's
//! single-writer lock followed by an immediate full-snapshot persist.

use crate::error::AppError;
use crate::models::{
    Client, ClientPayload, EnrichedInvoice, EnrichedLineItem, Invoice, InvoicePayload,
    InvoiceStatus, InvoiceView, LineItemInput, Service, ServicePayload, User, UserProfile,
    default_iva_rate,
};
use crate::money;
use crate::store::{JsonStore, Snapshot};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use tracing::{info, instrument};
use validator::Validate;

/// Placeholder shown when an invoice references a deleted client.
pub const UNKNOWN_CLIENT: &str = "Cliente desconocido";
/// Placeholder shown when a line item references a deleted service.
pub const UNKNOWN_SERVICE: &str = "Servicio desconocido";

/// The billing ledger: clients, services, invoices and users over one
/// JSON snapshot store.
pub struct Ledger {
    store: JsonStore,
}

impl Ledger {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    // -------------------------------------------------------------------------
    // Client operations
    // -------------------------------------------------------------------------

    pub async fn list_clients(&self) -> Vec<Client> {
        self.store.load().await.clients
    }

    pub async fn get_client(&self, id: u64) -> Option<Client> {
        self.store
            .load()
            .await
            .clients
            .into_iter()
            .find(|c| c.id == id)
    }

    #[instrument(skip(self, payload))]
    pub async fn create_client(&self, payload: &ClientPayload) -> Result<Client, AppError> {
        payload.validate()?;

        let client = self
            .store
            .mutate(|snapshot| {
                let client = Client {
                    id: snapshot.next_client_id(),
                    name: payload.name.clone(),
                    email: payload.email.clone(),
                    phone: payload.phone.clone(),
                    address: payload.address.clone(),
                    city: payload.city.clone(),
                    postal_code: payload.postal_code.clone(),
                    cif_nif: payload.cif_nif.clone(),
                    created_at: Utc::now(),
                };
                snapshot.clients.push(client.clone());
                Ok(client)
            })
            .await?;

        info!(client_id = client.id, name = %client.name, "Client created");
        Ok(client)
    }

    /// Full-field replace; only the identifier and creation timestamp are
    /// preserved from the stored record.
    pub async fn update_client(
        &self,
        id: u64,
        payload: &ClientPayload,
    ) -> Result<Option<Client>, AppError> {
        payload.validate()?;

        self.store
            .mutate(|snapshot| {
                let Some(client) = snapshot.clients.iter_mut().find(|c| c.id == id) else {
                    return Ok(None);
                };
                client.name = payload.name.clone();
                client.email = payload.email.clone();
                client.phone = payload.phone.clone();
                client.address = payload.address.clone();
                client.city = payload.city.clone();
                client.postal_code = payload.postal_code.clone();
                client.cif_nif = payload.cif_nif.clone();
                Ok(Some(client.clone()))
            })
            .await
    }

    /// Removes the client unconditionally. Invoices referencing the id are
    /// left with a dangling reference, an accepted inconsistency of this
    /// design; enrichment shows a placeholder name for them.
    pub async fn delete_client(&self, id: u64) -> Result<bool, AppError> {
        self.store
            .mutate(|snapshot| {
                let before = snapshot.clients.len();
                snapshot.clients.retain(|c| c.id != id);
                Ok(snapshot.clients.len() < before)
            })
            .await
    }

    // -------------------------------------------------------------------------
    // Service operations
    // -------------------------------------------------------------------------

    pub async fn list_services(&self) -> Vec<Service> {
        self.store.load().await.services
    }

    pub async fn get_service(&self, id: u64) -> Option<Service> {
        self.store
            .load()
            .await
            .services
            .into_iter()
            .find(|s| s.id == id)
    }

    fn service_fields(payload: &ServicePayload) -> Result<(Decimal, Decimal), AppError> {
        let price = payload
            .price
            .get()
            .ok_or_else(|| AppError::BadRequest("price is required".to_string()))?;
        if price < Decimal::ZERO {
            return Err(AppError::BadRequest("price must not be negative".to_string()));
        }
        let iva_rate = payload.iva_rate.get().unwrap_or_else(default_iva_rate);
        Ok((price, iva_rate))
    }

    #[instrument(skip(self, payload))]
    pub async fn create_service(&self, payload: &ServicePayload) -> Result<Service, AppError> {
        payload.validate()?;
        let (price, iva_rate) = Self::service_fields(payload)?;

        let service = self
            .store
            .mutate(|snapshot| {
                let service = Service {
                    id: snapshot.next_service_id(),
                    name: payload.name.clone(),
                    description: payload.description.clone(),
                    price: Some(price),
                    iva_rate,
                    created_at: Utc::now(),
                };
                snapshot.services.push(service.clone());
                Ok(service)
            })
            .await?;

        info!(service_id = service.id, name = %service.name, "Service created");
        Ok(service)
    }

    pub async fn update_service(
        &self,
        id: u64,
        payload: &ServicePayload,
    ) -> Result<Option<Service>, AppError> {
        payload.validate()?;
        let (price, iva_rate) = Self::service_fields(payload)?;

        self.store
            .mutate(|snapshot| {
                let Some(service) = snapshot.services.iter_mut().find(|s| s.id == id) else {
                    return Ok(None);
                };
                service.name = payload.name.clone();
                service.description = payload.description.clone();
                service.price = Some(price);
                service.iva_rate = iva_rate;
                Ok(Some(service.clone()))
            })
            .await
    }

    pub async fn delete_service(&self, id: u64) -> Result<bool, AppError> {
        self.store
            .mutate(|snapshot| {
                let before = snapshot.services.len();
                snapshot.services.retain(|s| s.id != id);
                Ok(snapshot.services.len() < before)
            })
            .await
    }

    // -------------------------------------------------------------------------
    // Invoice operations
    // -------------------------------------------------------------------------

    pub async fn list_invoices(&self) -> Vec<Invoice> {
        self.store.load().await.invoices
    }

    pub async fn list_invoices_enriched(&self) -> Vec<EnrichedInvoice> {
        let snapshot = self.store.load().await;
        snapshot
            .invoices
            .iter()
            .map(|invoice| enrich_invoice(invoice.clone(), &snapshot))
            .collect()
    }

    pub async fn get_invoice(&self, id: u64) -> Option<Invoice> {
        self.store
            .load()
            .await
            .invoices
            .into_iter()
            .find(|i| i.id == id)
    }

    pub async fn get_invoice_enriched(&self, id: u64) -> Option<EnrichedInvoice> {
        let snapshot = self.store.load().await;
        snapshot
            .invoices
            .iter()
            .find(|i| i.id == id)
            .map(|invoice| enrich_invoice(invoice.clone(), &snapshot))
    }

    /// Full enrichment for the PDF renderer and detail views: client
    /// contact fields plus service name/description on every line item.
    pub async fn view_invoice(&self, id: u64) -> Option<InvoiceView> {
        let snapshot = self.store.load().await;
        let invoice = snapshot.invoices.iter().find(|i| i.id == id)?;
        let client = snapshot.clients.iter().find(|c| c.id == invoice.client_id);

        let items = invoice
            .items
            .iter()
            .map(|item| {
                let service = snapshot.services.iter().find(|s| s.id == item.service_id);
                EnrichedLineItem {
                    item: item.clone(),
                    service_name: service
                        .map(|s| s.name.clone())
                        .unwrap_or_else(|| UNKNOWN_SERVICE.to_string()),
                    service_description: service.map(|s| s.description.clone()).unwrap_or_default(),
                }
            })
            .collect();

        Some(InvoiceView {
            id: invoice.id,
            invoice_number: invoice.invoice_number.clone(),
            client_id: invoice.client_id,
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            status: invoice.status,
            notes: invoice.notes.clone(),
            created_at: invoice.created_at,
            client_name: client
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
            client_email: client.map(|c| c.email.clone()).unwrap_or_default(),
            client_phone: client.map(|c| c.phone.clone()).unwrap_or_default(),
            client_address: client.map(|c| c.address.clone()).unwrap_or_default(),
            items,
            total: money::round_cents(money::invoice_total(invoice)),
        })
    }

    /// Normalizes the loosely typed payload, assigns the identifier and
    /// invoice number, and persists. The returned record carries no derived
    /// total; callers compute it through [`crate::money`].
    #[instrument(skip(self, payload))]
    pub async fn create_invoice(&self, payload: &InvoicePayload) -> Result<Invoice, AppError> {
        let client_id = payload
            .client_id
            .as_ref()
            .and_then(|raw| raw.get())
            .ok_or_else(|| {
                AppError::BadRequest("client_id must be a positive integer".to_string())
            })?;
        let status = parse_status(payload.status.as_deref())?.unwrap_or_default();
        let items = normalize_items(payload.items.as_deref().unwrap_or(&[]))?;

        let invoice = self
            .store
            .mutate(|snapshot| {
                let id = snapshot.next_invoice_id();
                let now = Utc::now();
                let invoice = Invoice {
                    id,
                    invoice_number: format!("EMB-{}-{:06}", now.year(), id),
                    client_id,
                    issue_date: payload.issue_date,
                    due_date: payload.due_date,
                    status,
                    notes: payload.notes.clone().unwrap_or_default(),
                    items: items.clone(),
                    created_at: now,
                };
                snapshot.invoices.push(invoice.clone());
                Ok(invoice)
            })
            .await?;

        info!(
            invoice_id = invoice.id,
            invoice_number = %invoice.invoice_number,
            client_id = invoice.client_id,
            "Invoice created"
        );
        Ok(invoice)
    }

    /// Shallow merge: only fields present in the payload are written, the
    /// rest of the stored record is preserved. Line items are re-normalized
    /// and replaced wholesale only when explicitly provided. A provided
    /// `client_id` must coerce to an id, same as at creation.
    pub async fn update_invoice(
        &self,
        id: u64,
        payload: &InvoicePayload,
    ) -> Result<Option<Invoice>, AppError> {
        let client_id = payload
            .client_id
            .as_ref()
            .map(|raw| {
                raw.get().ok_or_else(|| {
                    AppError::BadRequest("client_id must be a positive integer".to_string())
                })
            })
            .transpose()?;
        let status = parse_status(payload.status.as_deref())?;
        let items = payload
            .items
            .as_deref()
            .map(normalize_items)
            .transpose()?;

        self.store
            .mutate(|snapshot| {
                let Some(invoice) = snapshot.invoices.iter_mut().find(|i| i.id == id) else {
                    return Ok(None);
                };
                if let Some(client_id) = client_id {
                    invoice.client_id = client_id;
                }
                if let Some(issue_date) = payload.issue_date {
                    invoice.issue_date = Some(issue_date);
                }
                if let Some(due_date) = payload.due_date {
                    invoice.due_date = Some(due_date);
                }
                if let Some(status) = status {
                    invoice.status = status;
                }
                if let Some(notes) = &payload.notes {
                    invoice.notes = notes.clone();
                }
                if let Some(items) = items {
                    invoice.items = items;
                }
                Ok(Some(invoice.clone()))
            })
            .await
    }

    /// Validates against the four-value enum before touching the store; an
    /// unknown status is rejected and leaves the record untouched.
    pub async fn update_invoice_status(
        &self,
        id: u64,
        status: &str,
    ) -> Result<Option<Invoice>, AppError> {
        let status = InvoiceStatus::parse(status).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid status '{}'. Must be one of: pending, paid, overdue, cancelled",
                status
            ))
        })?;

        let updated = self
            .store
            .mutate(|snapshot| {
                let Some(invoice) = snapshot.invoices.iter_mut().find(|i| i.id == id) else {
                    return Ok(None);
                };
                invoice.status = status;
                Ok(Some(invoice.clone()))
            })
            .await?;

        if let Some(invoice) = &updated {
            info!(invoice_id = invoice.id, status = status.as_str(), "Invoice status updated");
        }
        Ok(updated)
    }

    /// No cascade and no referential check against clients or services.
    pub async fn delete_invoice(&self, id: u64) -> Result<bool, AppError> {
        self.store
            .mutate(|snapshot| {
                let before = snapshot.invoices.len();
                snapshot.invoices.retain(|i| i.id != id);
                Ok(snapshot.invoices.len() < before)
            })
            .await
    }

    // -------------------------------------------------------------------------
    // User operations
    // -------------------------------------------------------------------------

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.store
            .load()
            .await
            .users
            .into_iter()
            .find(|u| u.email == email)
    }

    pub async fn find_user_by_id(&self, id: u64) -> Option<User> {
        self.store.load().await.users.into_iter().find(|u| u.id == id)
    }

    pub async fn list_users(&self) -> Vec<UserProfile> {
        self.store
            .load()
            .await
            .users
            .iter()
            .map(UserProfile::from)
            .collect()
    }
}

/// Attach the client name and rounded derived total to a stored invoice.
pub fn enrich_invoice(invoice: Invoice, snapshot: &Snapshot) -> EnrichedInvoice {
    let client_name = snapshot
        .clients
        .iter()
        .find(|c| c.id == invoice.client_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());
    let total = money::round_cents(money::invoice_total(&invoice));
    EnrichedInvoice {
        invoice,
        client_name,
        total,
    }
}

fn parse_status(status: Option<&str>) -> Result<Option<InvoiceStatus>, AppError> {
    match status {
        None => Ok(None),
        Some(s) => InvoiceStatus::parse(s)
            .map(Some)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Invalid status '{}'. Must be one of: pending, paid, overdue, cancelled",
                    s
                ))
            }),
    }
}

fn normalize_items(items: &[LineItemInput]) -> Result<Vec<crate::models::LineItem>, AppError> {
    items.iter().map(LineItemInput::normalize).collect()
}
