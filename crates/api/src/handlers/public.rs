//! Unauthenticated endpoints reached through an event's public link.

use autoriza_core::error::CoreError;
use autoriza_core::validation::{validate_name, validate_student_id_number};
use autoriza_db::models::authorization::{Authorization, PreRegisteredStudent};
use autoriza_db::models::event::{Event, PublicEventDetail, PublicEventSummary};
use autoriza_db::repositories::{AuthorizationRepo, EventRepo};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{resource_not_found, AppResult};
use crate::handlers::submission::{
    commit_with_file, notify_submission, store_upload, SubmissionForm,
};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/public/events
pub async fn list_events(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PublicEventSummary>>>> {
    let events = EventRepo::list_public(&state.pool).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/public/events/{link}
pub async fn get_event(
    State(state): State<AppState>,
    Path(link): Path<String>,
) -> AppResult<Json<DataResponse<PublicEventDetail>>> {
    let event = EventRepo::find_public_by_link(&state.pool, &link)
        .await?
        .ok_or_else(|| resource_not_found("Event"))?;
    Ok(Json(DataResponse { data: event }))
}

/// GET /api/v1/public/events/{link}/pre-registered
///
/// Names the student can pick from before submitting. Only ids and names
/// are exposed.
pub async fn list_pre_registered(
    State(state): State<AppState>,
    Path(link): Path<String>,
) -> AppResult<Json<DataResponse<Vec<PreRegisteredStudent>>>> {
    let event = find_event(&state, &link).await?;
    let students = AuthorizationRepo::list_pre_registered(&state.pool, event.id).await?;
    Ok(Json(DataResponse { data: students }))
}

/// POST /api/v1/public/events/{link}/authorizations
///
/// Self-registration: a student not on the pre-registered list submits
/// everything at once. The record starts out `submitted`.
pub async fn self_register(
    State(state): State<AppState>,
    Path(link): Path<String>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Authorization>>)> {
    let event = find_event(&state, &link).await?;

    let mut form = SubmissionForm::read(multipart).await?;
    let student_name = validate_name(
        "Student name",
        form.student_name.as_deref().unwrap_or_default(),
    )?;
    let student_id_number = validate_student_id_number(form.student_id_number.as_deref())?;
    let contact = form.contact()?;
    let file = form.take_file()?;

    let details = store_upload(&state, contact, &file).await?;
    let authorization = commit_with_file(
        &state,
        &details,
        async {
            AuthorizationRepo::create_submitted(
                &state.pool,
                event.id,
                &student_name,
                student_id_number.as_deref(),
                &details,
            )
            .await
            .map(Some)
        },
        CoreError::Internal("Self-registration insert returned no row".into()),
    )
    .await?;

    tracing::info!(
        event_id = event.id,
        authorization_id = authorization.id,
        "Student self-registered"
    );
    notify_submission(&state, &authorization, &event).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: authorization })))
}

async fn find_event(state: &AppState, link: &str) -> AppResult<Event> {
    EventRepo::find_by_public_link(&state.pool, link)
        .await?
        .ok_or_else(|| resource_not_found("Event"))
}
