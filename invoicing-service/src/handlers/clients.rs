//! Client CRUD handlers.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use serde::Serialize;

use billing_core::models::{Client, ClientPayload};
use billing_core::AppError;

use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    pub clients: Vec<Client>,
}

#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub client: Client,
}

#[derive(Debug, Serialize)]
pub struct ClientCreatedResponse {
    pub message: String,
    pub client: Client,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /api/clients
pub async fn list_clients(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Json<ClientsResponse> {
    Json(ClientsResponse {
        clients: state.ledger.list_clients().await,
    })
}

/// GET /api/clients/:id
pub async fn get_client(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<u64>,
) -> Result<Json<ClientResponse>, AppError> {
    let client = state
        .ledger
        .get_client(id)
        .await
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

    Ok(Json(ClientResponse { client }))
}

/// POST /api/clients
pub async fn create_client(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Json(payload): Json<ClientPayload>,
) -> Result<(StatusCode, Json<ClientCreatedResponse>), AppError> {
    let client = state.ledger.create_client(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ClientCreatedResponse {
            message: "Client created successfully".to_string(),
            client,
        }),
    ))
}

/// PUT /api/clients/:id
pub async fn update_client(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<u64>,
    Json(payload): Json<ClientPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .ledger
        .update_client(id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

    Ok(Json(MessageResponse {
        message: "Client updated successfully".to_string(),
    }))
}

/// DELETE /api/clients/:id
pub async fn delete_client(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    let deleted = state.ledger.delete_client(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Client not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Client deleted successfully".to_string(),
    }))
}
