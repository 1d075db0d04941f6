//! Authentication handlers.
//!
//! Password login issuing a session JWT, profile lookup for the bearer of a
//! token, and the user listing used by the dashboard.

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use billing_core::models::UserProfile;
use billing_core::AppError;

use crate::middleware::AuthUser;
use crate::services::password;
use crate::AppState;

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response with the session token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

/// Profile response.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// User listing response.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserProfile>,
}

/// Authenticate with email and password.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let user = state
        .ledger
        .find_user_by_email(&req.email)
        .await
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash) {
        tracing::warn!(email = %req.email, "Login rejected, bad password");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.jwt.generate_token(&user)?;
    tracing::info!(user_id = user.id, email = %user.email, "Login successful");

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
            user: UserProfile::from(&user),
        }),
    ))
}

/// Profile of the authenticated user.
///
/// GET /api/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("Invalid token subject".to_string()))?;

    let user = state
        .ledger
        .find_user_by_id(user_id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        user: UserProfile::from(&user),
    }))
}

/// All registered users, without credentials.
///
/// GET /api/auth/users
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Json<UsersResponse> {
    let mut users = state.ledger.list_users().await;
    users.sort_by(|a, b| a.name.cmp(&b.name));
    Json(UsersResponse { users })
}
