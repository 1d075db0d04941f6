//! Service catalog CRUD handlers.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use serde::Serialize;

use billing_core::models::{Service, ServicePayload};
use billing_core::AppError;

use crate::handlers::clients::MessageResponse;
use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ServicesResponse {
    pub services: Vec<Service>,
}

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub service: Service,
}

#[derive(Debug, Serialize)]
pub struct ServiceCreatedResponse {
    pub message: String,
    pub service: Service,
}

/// GET /api/services
pub async fn list_services(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Json<ServicesResponse> {
    Json(ServicesResponse {
        services: state.ledger.list_services().await,
    })
}

/// GET /api/services/:id
pub async fn get_service(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<u64>,
) -> Result<Json<ServiceResponse>, AppError> {
    let service = state
        .ledger
        .get_service(id)
        .await
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

    Ok(Json(ServiceResponse { service }))
}

/// POST /api/services
pub async fn create_service(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Json(payload): Json<ServicePayload>,
) -> Result<(StatusCode, Json<ServiceCreatedResponse>), AppError> {
    let service = state.ledger.create_service(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ServiceCreatedResponse {
            message: "Service created successfully".to_string(),
            service,
        }),
    ))
}

/// PUT /api/services/:id
pub async fn update_service(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<u64>,
    Json(payload): Json<ServicePayload>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .ledger
        .update_service(id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

    Ok(Json(MessageResponse {
        message: "Service updated successfully".to_string(),
    }))
}

/// DELETE /api/services/:id
pub async fn delete_service(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    let deleted = state.ledger.delete_service(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Service not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Service deleted successfully".to_string(),
    }))
}
