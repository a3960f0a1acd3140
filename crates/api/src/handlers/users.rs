//! Handlers for the `/users` resource.

use autoriza_core::error::CoreError;
use autoriza_core::roles::Role;
use autoriza_core::types::DbId;
use autoriza_core::validation::{normalize_email, validate_name, validate_password};
use autoriza_db::models::user::{CreateUser, UserResponse};
use autoriza_db::repositories::{CampusRepo, UserRepo};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub campus_id: Option<DbId>,
}

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::not_found("User", user.user_id))?;
    Ok(Json(DataResponse { data: row.into() }))
}

/// GET /api/v1/users (admin)
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/users (admin)
///
/// Create an active account with a password set by the admin.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let name = validate_name("Name", &input.name)?;
    let email = normalize_email("Email", &input.email)?;
    validate_password(&input.password)?;

    if let Some(campus_id) = input.campus_id {
        CampusRepo::find_by_id(&state.pool, campus_id)
            .await?
            .ok_or(CoreError::not_found("Campus", campus_id))?;
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name,
            email,
            password_hash: Some(password_hash),
            role: input.role,
            is_active: true,
            campus_id: input.campus_id,
            verification_code: None,
            verification_code_expires_at: None,
        },
    )
    .await?;

    tracing::info!(admin_id = admin.user_id, user_id = user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user.into() })))
}
