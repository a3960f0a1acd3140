//! Handlers for the `/authorizations` resource.
//!
//! `submit` is public: the student reaches it from the event's public page.
//! Everything else is gated on ownership of the parent event.

use autoriza_core::authorization::{ensure_transition, AuthorizationStatus, ReviewDecision};
use autoriza_core::error::CoreError;
use autoriza_core::types::DbId;
use autoriza_db::models::authorization::Authorization;
use autoriza_db::repositories::{AuthorizationRepo, EventRepo};
use autoriza_events::Notification;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::access::load_authorization_for_user;
use crate::error::AppResult;
use crate::handlers::submission::{
    commit_with_file, notify_submission, store_upload, student_contact, SubmissionForm,
};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PATCH /authorizations/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    /// Only used for rejections; sent to the student and the guardian.
    pub reason: Option<String>,
}

/// PUT /api/v1/authorizations/{id}/submit
///
/// Multipart form with the contact fields and the signed document. Moves a
/// `pre-registered` record to `submitted`.
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Authorization>>> {
    let current = AuthorizationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::not_found("Authorization", id))?;
    ensure_transition(current.status, AuthorizationStatus::Submitted)?;

    let mut form = SubmissionForm::read(multipart).await?;
    let contact = form.contact()?;
    let file = form.take_file()?;

    let details = store_upload(&state, contact, &file).await?;
    let authorization = commit_with_file(
        &state,
        &details,
        AuthorizationRepo::submit(&state.pool, id, &details),
        CoreError::validation("Authorization has already been submitted"),
    )
    .await?;

    tracing::info!(
        authorization_id = id,
        event_id = authorization.event_id,
        size = details.file_size,
        "Authorization submitted"
    );

    match EventRepo::find_by_id(&state.pool, authorization.event_id).await? {
        Some(event) => notify_submission(&state, &authorization, &event).await,
        None => tracing::warn!(authorization_id = id, "Submitted authorization has no event"),
    }

    Ok(Json(DataResponse {
        data: authorization,
    }))
}

/// GET /api/v1/authorizations/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Authorization>>> {
    let (authorization, _event) = load_authorization_for_user(&state.pool, id, &user).await?;
    Ok(Json(DataResponse {
        data: authorization,
    }))
}

/// PATCH /api/v1/authorizations/{id}/status
///
/// Approve or reject a submitted authorization.
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<Authorization>>> {
    let (current, event) = load_authorization_for_user(&state.pool, id, &user).await?;
    let decision = ReviewDecision::parse(&input.status)?;
    let target = decision.apply_to(current.status)?;

    let authorization = AuthorizationRepo::review(&state.pool, id, target)
        .await?
        .ok_or_else(|| CoreError::validation("Authorization is no longer awaiting review"))?;

    tracing::info!(
        user_id = user.user_id,
        authorization_id = id,
        status = %target,
        "Authorization reviewed"
    );

    let student = student_contact(&authorization);
    let event_title = event.title;
    state.notifications.publish(match decision {
        ReviewDecision::Approve => Notification::AuthorizationApproved {
            student,
            event_title,
        },
        ReviewDecision::Reject => Notification::AuthorizationRejected {
            student,
            event_title,
            reason: input
                .reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        },
    });

    Ok(Json(DataResponse {
        data: authorization,
    }))
}

/// GET /api/v1/authorizations/{id}/file
///
/// Stream back the stored permission document.
pub async fn download_file(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (authorization, _event) = load_authorization_for_user(&state.pool, id, &user).await?;

    let reference = authorization
        .stored_file_reference
        .as_deref()
        .ok_or(CoreError::not_found("File", id))?;
    let bytes = state.file_store.open(reference).await?;

    let content_type = authorization
        .file_mime_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let filename = attachment_filename(authorization.original_filename.as_deref());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

/// Reduce a user-supplied filename to something safe inside a quoted
/// `Content-Disposition` value.
fn attachment_filename(original: Option<&str>) -> String {
    let cleaned: String = original
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}
