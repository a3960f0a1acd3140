//! Handlers for the `/events` resource and its authorizations.

use std::collections::HashMap;

use autoriza_core::error::CoreError;
use autoriza_core::types::DbId;
use autoriza_core::validation::{
    validate_event_fields, validate_name, validate_student_id_number, EventFields,
};
use autoriza_db::models::authorization::{
    Authorization, AuthorizationWithAttendance, CreatePreRegistration,
};
use autoriza_db::models::event::{CreateEvent, Event, EventWithCount, UpdateEvent};
use autoriza_db::repositories::{
    AttendanceRepo, AuthorizationRepo, CampusRepo, EventRepo, UserRepo,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::access::load_event_for_user;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::CampusFilter;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Event CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/events
///
/// Admins see every event; everyone else sees only their own.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<CampusFilter>,
) -> AppResult<Json<DataResponse<Vec<EventWithCount>>>> {
    let owner = user.principal().event_owner_filter();
    let events = EventRepo::list(&state.pool, owner, filter.campus_id).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/events
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    validate_event_fields(EventFields {
        title: &input.title,
        start_date: input.start_date,
        end_date: input.end_date,
        location: input.location.as_deref(),
        schedule_text: input.schedule_text.as_deref(),
    })?;

    let campus_id = match input.campus_id {
        Some(id) => id,
        None => creator_campus(&state, &user).await?,
    };
    CampusRepo::find_by_id(&state.pool, campus_id)
        .await?
        .ok_or(CoreError::not_found("Campus", campus_id))?;

    let public_link = Uuid::new_v4().to_string();
    let event =
        EventRepo::create(&state.pool, user.user_id, campus_id, &public_link, &input).await?;

    tracing::info!(user_id = user.user_id, event_id = event.id, campus_id, "Event created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/events/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = load_event_for_user(&state.pool, id, &user).await?;
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/events/{id}
///
/// Partial update; the merged result is validated as a whole.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<Json<DataResponse<Event>>> {
    let current = load_event_for_user(&state.pool, id, &user).await?;

    validate_event_fields(EventFields {
        title: input.title.as_deref().unwrap_or(&current.title),
        start_date: input.start_date.unwrap_or(current.start_date),
        end_date: input.end_date.unwrap_or(current.end_date),
        location: input.location.as_deref().or(current.location.as_deref()),
        schedule_text: input
            .schedule_text
            .as_deref()
            .or(current.schedule_text.as_deref()),
    })?;

    if let Some(campus_id) = input.campus_id {
        CampusRepo::find_by_id(&state.pool, campus_id)
            .await?
            .ok_or(CoreError::not_found("Campus", campus_id))?;
    }

    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::not_found("Event", id))?;
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/events/{id}
///
/// Removes the event with its authorizations and attendance, then the
/// stored documents.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_event_for_user(&state.pool, id, &user).await?;

    let references = EventRepo::delete(&state.pool, id)
        .await?
        .ok_or(CoreError::not_found("Event", id))?;

    for reference in &references {
        state.file_store.delete_quietly(reference).await;
    }

    tracing::info!(
        user_id = user.user_id,
        event_id = id,
        files = references.len(),
        "Event deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Authorizations of an event
// ---------------------------------------------------------------------------

/// GET /api/v1/events/{id}/authorizations
///
/// Every authorization of the event, each with its attendance records.
pub async fn list_authorizations(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AuthorizationWithAttendance>>>> {
    load_event_for_user(&state.pool, id, &user).await?;

    let authorizations = AuthorizationRepo::list_for_event(&state.pool, id).await?;
    let mut attendance_by_authorization: HashMap<DbId, Vec<_>> = HashMap::new();
    for record in AttendanceRepo::list_for_event(&state.pool, id).await? {
        attendance_by_authorization
            .entry(record.authorization_id)
            .or_default()
            .push(record);
    }

    let data = authorizations
        .into_iter()
        .map(|authorization| AuthorizationWithAttendance {
            attendance: attendance_by_authorization
                .remove(&authorization.id)
                .unwrap_or_default(),
            authorization,
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/events/{id}/authorizations
///
/// Pre-register a student; the student completes the record later.
pub async fn pre_register(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePreRegistration>,
) -> AppResult<(StatusCode, Json<DataResponse<Authorization>>)> {
    let event = load_event_for_user(&state.pool, id, &user).await?;

    let input = CreatePreRegistration {
        student_name: validate_name("Student name", &input.student_name)?,
        student_id_number: validate_student_id_number(input.student_id_number.as_deref())?,
    };
    let authorization =
        AuthorizationRepo::create_pre_registered(&state.pool, event.id, &input).await?;

    tracing::info!(
        user_id = user.user_id,
        event_id = event.id,
        authorization_id = authorization.id,
        "Student pre-registered"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: authorization })))
}

async fn creator_campus(state: &AppState, user: &AuthUser) -> AppResult<DbId> {
    let creator = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::not_found("User", user.user_id))?;
    Ok(creator
        .campus_id
        .ok_or_else(|| CoreError::validation("campus_id is required"))?)
}
