//! JWT-based authentication extractor for Axum handlers.

use autoriza_core::access::Principal;
use autoriza_core::error::CoreError;
use autoriza_core::roles::Role;
use autoriza_core::types::DbId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// The decoded id, email and role are trusted as-is.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.uid`).
    pub user_id: DbId,
    /// The user's email (from `claims.sub`).
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn principal(&self) -> Principal {
        Principal::new(self.user_id, self.role)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let role: Role = claims.role.parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.uid,
            email: claims.sub,
            role,
        })
    }
}
