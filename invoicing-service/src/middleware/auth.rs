use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use billing_core::AppError;

use crate::services::Claims;
use crate::AppState;

/// Extractor for the authenticated user behind a `Bearer` token.
/// Every `/api` route except login and health requires it.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing authorization token".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Missing authorization token".to_string()))?;

        let claims = state.jwt.validate_token(token)?;
        Ok(AuthUser(claims))
    }
}
