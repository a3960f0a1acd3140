//! Handlers for per-day attendance of an authorization.

use autoriza_core::attendance::{
    ensure_attendance_allowed, ensure_date_in_window, AttendanceUpdate,
};
use autoriza_core::types::{Date, DbId};
use autoriza_db::models::attendance::Attendance;
use autoriza_db::repositories::AttendanceRepo;
use axum::extract::{Path, State};
use axum::Json;

use crate::access::load_authorization_for_user;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/authorizations/{id}/attendance
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Attendance>>>> {
    load_authorization_for_user(&state.pool, id, &user).await?;
    let records = AttendanceRepo::list_for_authorization(&state.pool, id).await?;
    Ok(Json(DataResponse { data: records }))
}

/// PATCH /api/v1/authorizations/{id}/attendance/{date}
///
/// Set either leg for one day of the event. The authorization must be
/// approved and the date must fall inside the event period.
pub async fn mark(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, date)): Path<(DbId, Date)>,
    Json(update): Json<AttendanceUpdate>,
) -> AppResult<Json<DataResponse<Attendance>>> {
    let (authorization, event) = load_authorization_for_user(&state.pool, id, &user).await?;
    ensure_attendance_allowed(authorization.status)?;
    ensure_date_in_window(date, event.start_date, event.end_date)?;

    let current = AttendanceRepo::find(&state.pool, id, date)
        .await?
        .map(|a| a.marks())
        .unwrap_or_default();
    let marks = current.apply(update)?;

    let record = AttendanceRepo::upsert(&state.pool, id, date, marks).await?;
    tracing::debug!(
        user_id = user.user_id,
        authorization_id = id,
        %date,
        outbound = marks.present_outbound,
        ret = marks.present_return,
        "Attendance marked"
    );
    Ok(Json(DataResponse { data: record }))
}
