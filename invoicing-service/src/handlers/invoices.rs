//! Invoice handlers. Listing and detail endpoints return enriched records
//! with the derived total; writes go through the ledger's normalization.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use billing_core::models::{EnrichedInvoice, Invoice, InvoicePayload, InvoiceView};
use billing_core::AppError;

use crate::handlers::clients::MessageResponse;
use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct InvoicesResponse {
    pub invoices: Vec<EnrichedInvoice>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub invoice: EnrichedInvoice,
}

#[derive(Debug, Serialize)]
pub struct InvoiceCreatedResponse {
    pub invoice: Invoice,
}

#[derive(Debug, Serialize)]
pub struct InvoiceViewResponse {
    pub invoice: InvoiceView,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: String,
}

/// GET /api/invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Json<InvoicesResponse> {
    Json(InvoicesResponse {
        invoices: state.ledger.list_invoices_enriched().await,
    })
}

/// GET /api/invoices/:id
pub async fn get_invoice(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<u64>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let invoice = state
        .ledger
        .get_invoice_enriched(id)
        .await
        .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

    Ok(Json(InvoiceResponse { invoice }))
}

/// GET /api/invoices/:id/view
///
/// Full detail for a printable view: client contact fields plus line items
/// joined with their service names.
pub async fn view_invoice(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<u64>,
) -> Result<Json<InvoiceViewResponse>, AppError> {
    let invoice = state
        .ledger
        .view_invoice(id)
        .await
        .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

    Ok(Json(InvoiceViewResponse { invoice }))
}

/// POST /api/invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Json(payload): Json<InvoicePayload>,
) -> Result<(StatusCode, Json<InvoiceCreatedResponse>), AppError> {
    let invoice = state.ledger.create_invoice(&payload).await?;

    Ok((StatusCode::CREATED, Json(InvoiceCreatedResponse { invoice })))
}

/// PUT /api/invoices/:id
pub async fn update_invoice(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<u64>,
    Json(payload): Json<InvoicePayload>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .ledger
        .update_invoice(id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

    Ok(Json(MessageResponse {
        message: "Invoice updated successfully".to_string(),
    }))
}

/// PATCH /api/invoices/:id/status
pub async fn update_invoice_status(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<u64>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .ledger
        .update_invoice_status(id, &req.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

    Ok(Json(MessageResponse {
        message: "Status updated successfully".to_string(),
    }))
}

/// DELETE /api/invoices/:id
pub async fn delete_invoice(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    let deleted = state.ledger.delete_invoice(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Invoice not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Invoice deleted successfully".to_string(),
    }))
}
