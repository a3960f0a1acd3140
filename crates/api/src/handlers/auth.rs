//! Handlers for the `/auth` resource: registration, verification codes,
//! password setting and login.

use autoriza_core::error::CoreError;
use autoriza_core::roles::Role;
use autoriza_core::types::{DbId, Timestamp};
use autoriza_core::validation::{normalize_email, validate_name, validate_password};
use autoriza_core::verification::{issue_code, verify_code, CodePurpose, INVALID_CODE_MESSAGE};
use autoriza_db::models::user::{CreateUser, User, UserResponse};
use autoriza_db::repositories::{CampusRepo, UserRepo};
use autoriza_events::Notification;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

const CODE_SENT: &str = "If the account exists, a verification code was sent";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub campus_id: Option<DbId>,
}

/// Request body for `POST /auth/request-code`.
#[derive(Debug, Deserialize)]
pub struct RequestCodeRequest {
    pub email: String,
}

/// Request body for `POST /auth/verify-code`.
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

/// Request body for `POST /auth/set-password`.
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub email: String,
    pub code: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub email: String,
    pub code_expires_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct VerifyCodeResponse {
    pub valid: bool,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an inactive professor account and email a verification code. An
/// existing inactive account gets a fresh code instead.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<RegisterResponse>>)> {
    let name = validate_name("Name", &input.name)?;
    let email = normalize_email("Email", &input.email)?;

    if let Some(campus_id) = input.campus_id {
        CampusRepo::find_by_id(&state.pool, campus_id)
            .await?
            .ok_or(CoreError::not_found("Campus", campus_id))?;
    }

    let issued = issue_code(Utc::now());

    let user = match UserRepo::find_by_email(&state.pool, &email).await? {
        Some(existing) if existing.is_active => {
            return Err(CoreError::Conflict("Email is already registered".into()).into());
        }
        Some(existing) => UserRepo::refresh_pending_registration(
            &state.pool,
            existing.id,
            &name,
            input.campus_id,
            &issued.code,
            issued.expires_at,
        )
        .await?
        .ok_or_else(|| CoreError::Conflict("Email is already registered".into()))?,
        None => {
            let create = CreateUser {
                name,
                email: email.clone(),
                password_hash: None,
                role: Role::Professor,
                is_active: false,
                campus_id: input.campus_id,
                verification_code: Some(issued.code.clone()),
                verification_code_expires_at: Some(issued.expires_at),
            };
            UserRepo::create(&state.pool, &create).await?
        }
    };

    tracing::info!(user_id = user.id, "Registration code issued");
    send_code(&state, &user, issued.code, CodePurpose::Registration);

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RegisterResponse {
                email: user.email,
                code_expires_at: issued.expires_at,
            },
        }),
    ))
}

/// POST /api/v1/auth/request-code
///
/// Issue a new code for an existing account. Always answers 202 so callers
/// cannot tell which emails are registered.
pub async fn request_code(
    State(state): State<AppState>,
    Json(input): Json<RequestCodeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<MessageResponse>>)> {
    let accepted = (
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: MessageResponse { message: CODE_SENT },
        }),
    );

    let Ok(email) = normalize_email("Email", &input.email) else {
        return Ok(accepted);
    };
    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        tracing::debug!("Code requested for unknown email");
        return Ok(accepted);
    };

    let issued = issue_code(Utc::now());
    UserRepo::set_verification_code(&state.pool, user.id, &issued.code, issued.expires_at)
        .await?;

    let purpose = if user.is_active {
        CodePurpose::PasswordReset
    } else {
        CodePurpose::Registration
    };
    tracing::info!(user_id = user.id, ?purpose, "Verification code issued");
    send_code(&state, &user, issued.code, purpose);

    Ok(accepted)
}

/// POST /api/v1/auth/verify-code
///
/// Check a code without consuming it.
pub async fn verify_code_handler(
    State(state): State<AppState>,
    Json(input): Json<VerifyCodeRequest>,
) -> AppResult<Json<DataResponse<VerifyCodeResponse>>> {
    check_code(&state, &input.email, &input.code).await?;
    Ok(Json(DataResponse {
        data: VerifyCodeResponse { valid: true },
    }))
}

/// POST /api/v1/auth/set-password
///
/// Consume a valid code, store the new password and activate the account.
pub async fn set_password(
    State(state): State<AppState>,
    Json(input): Json<SetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password(&input.password)?;
    let user = check_code(&state, &input.email, &input.code).await?;

    let hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let consumed =
        UserRepo::set_password_and_activate(&state.pool, user.id, &input.code, &hash).await?;
    if !consumed {
        return Err(AppError::Core(CoreError::Validation(
            INVALID_CODE_MESSAGE.into(),
        )));
    }

    tracing::info!(user_id = user.id, "Password set, account active");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password and receive a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let email = normalize_email("Email", &input.email).map_err(|_| invalid())?;
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    let Some(password_hash) = user.password_hash.as_deref().filter(|_| user.is_active) else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is not active".into(),
        )));
    };

    let password_valid = verify_password(&input.password, password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    let access_token = generate_access_token(user.id, &user.email, user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");
    Ok(Json(DataResponse {
        data: LoginResponse {
            access_token,
            token_type: "bearer",
            expires_in: state.config.jwt.access_token_expiry_mins * 60,
            user: user.into(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Find the user by email and check the supplied code. Unknown emails get the
/// same error as wrong codes.
async fn check_code(state: &AppState, email: &str, code: &str) -> AppResult<User> {
    let invalid = || AppError::Core(CoreError::Validation(INVALID_CODE_MESSAGE.into()));

    let email = normalize_email("Email", email).map_err(|_| invalid())?;
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    verify_code(
        user.verification_code.as_deref(),
        user.verification_code_expires_at,
        code,
        Utc::now(),
    )?;
    Ok(user)
}

fn send_code(state: &AppState, user: &User, code: String, purpose: CodePurpose) {
    state.notifications.publish(Notification::VerificationCode {
        email: user.email.clone(),
        name: user.name.clone(),
        code,
        purpose,
    });
}
